//! Snapshot tests for whole-file rewrites.

use declassify::{declassify, DeclassifyOptions, SourceKind};

fn rewrite(source: &str, kind: SourceKind) -> String {
    let output = declassify(source, kind, &DeclassifyOptions::default())
        .unwrap_or_else(|err| panic!("declassify failed: {err}"));
    output.code.trim_end().to_string()
}

#[test]
fn test_prop_types() {
    let source = r#"import { Component, Prop, Vue } from 'vue-property-decorator'
import { User } from './types'

type Handler = (value: string) => void

@Component
export default class UserCard extends Vue {
  /** The user to show. */
  @Prop({ required: true }) readonly user!: User

  @Prop() readonly tags!: string[]

  @Prop({ default: () => {} }) readonly onSelect!: Handler

  @Prop() readonly label?: string | null
}
"#;
    insta::assert_snapshot!(rewrite(source, SourceKind::Module), @r"
import { User } from './types'
import Vue, { PropType } from 'vue'

type Handler = (value: string) => void

export default Vue.extend({
  name: 'UserCard',
  props: {
    /**
     * The user to show.
     */
    user: {
      type: Object as PropType<User>,
      required: true
    },
    tags: {
      type: Array as PropType<string[]>,
      required: false
    },
    onSelect: {
      type: Function as PropType<Handler>,
      default: () => {}
    },
    label: {
      type: String,
      required: false
    }
  }
})
");
}

#[test]
fn test_bindings_and_watchers() {
    let source = r#"import { Component, PropSync, VModel, Watch, Vue } from 'vue-property-decorator'

@Component({
  components: { Child },
})
export default class Editor extends Vue {
  @VModel() text!: string
  @PropSync('open', { default: false }) isOpen!: boolean

  get length(): number {
    return this.text.length
  }

  @Watch('text')
  @Watch('open', { immediate: true })
  onChange() {
    this.$forceUpdate()
  }

  @Watch('text', { deep: true })
  onText(value: string) {
    console.log(value)
  }

  mounted() {
    this.onChange()
  }
}
"#;
    insta::assert_snapshot!(rewrite(source, SourceKind::Module), @r"
import Vue from 'vue'

export default Vue.extend({
  name: 'Editor',
  components: { Child },
  props: {
    value: {
      type: String,
      required: true
    },
    open: {
      type: Boolean,
      default: false
    }
  },
  computed: {
    text: {
      get(): string {
        return this.value
      },
      set(value: string) {
        this.$emit('input', value)
      }
    },
    isOpen: {
      get(): boolean {
        return this.open
      },
      set(value: boolean) {
        this.$emit('update:open', value)
      }
    },
    length(): number {
      return this.text.length
    }
  },
  watch: {
    'text': [
      {
        handler: 'onChange'
      },
      {
        handler: 'onText',
        deep: true
      }
    ],
    'open': {
      handler: 'onChange',
      immediate: true
    }
  },
  mounted() {
    this.onChange()
  },
  methods: {
    onChange() {
      this.$forceUpdate()
    },
    onText(value: string) {
      console.log(value)
    }
  }
})
");
}

#[test]
fn test_emit_methods() {
    let source = r#"import Component from 'vue-class-component'
import { Emit } from 'vue-property-decorator'
import Vue from 'vue'

@Component
export default class Picker extends Vue {
  @Emit()
  clear() {
    this.selected = null
  }

  @Emit('change')
  @Emit()
  select(id: number) {
    const found = this.items.find((item) => {
      return item.id === id
    })
    if (!found) return
    return found
  }
}
"#;
    insta::assert_snapshot!(rewrite(source, SourceKind::Module), @r"
import Vue from 'vue'

export default Vue.extend({
  name: 'Picker',
  methods: {
    clear() {
      this.selected = null
      this.$emit('clear')
    },
    async select(id: number) {
      const found = this.items.find((item) => {
        return item.id === id
      })
      if (!found) {
        this.$emit('change', id)
        this.$emit('select', id)
        return
      }
      this.$emit('change', await found)
      this.$emit('select', await found)
      return
    }
  }
})
");
}

#[test]
fn test_emit_returned_values() {
    let source = r#"import { Component, Emit, Vue } from 'vue-property-decorator'

@Component
export default class Loader extends Vue {
  @Emit('load')
  @Emit('loaded')
  load(flag: boolean) {
    return flag ? this.fetch() : null
  }

  @Emit()
  counter(n: number) {
    return () => {
      return n
    }
  }

  @Emit()
  poll(c: boolean) {
    while (c) return 2
  }
}
"#;
    insta::assert_snapshot!(rewrite(source, SourceKind::Module), @r"
import Vue from 'vue'

export default Vue.extend({
  name: 'Loader',
  methods: {
    async load(flag: boolean) {
      this.$emit('load', await (flag ? this.fetch() : null))
      this.$emit('loaded', await (flag ? this.fetch() : null))
      return
    },
    async counter(n: number) {
      this.$emit('counter', await (() => {
        return n
      }))
      return
    },
    async poll(c: boolean) {
      while (c) {
        this.$emit('poll', await 2)
        return
      }
    }
  }
})
");
}

#[test]
fn test_single_file_component() {
    let source = r#"<template>
  <button @click="toggle">{{ label }}</button>
</template>

<script lang="ts">
import { Component, Prop, Vue } from 'vue-property-decorator'

@Component
export default class Toggle extends Vue {
  @Prop({ required: true }) readonly label!: string

  on = false

  toggle() {
    this.on = !this.on
  }
}
</script>

<style>
button { color: red; }
</style>
"#;
    insta::assert_snapshot!(rewrite(source, SourceKind::Component), @r#"
<template>
  <button @click="toggle">{{ label }}</button>
</template>

<script lang="ts">
import Vue from 'vue'

export default Vue.extend({
  name: 'Toggle',
  props: {
    label: {
      type: String,
      required: true
    }
  },
  data() {
    return {
      on: false
    }
  },
  methods: {
    toggle() {
      this.on = !this.on
    }
  }
})
</script>

<style>
button { color: red; }
</style>
"#);
}
