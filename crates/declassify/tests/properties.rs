//! Behavioural tests for the public rewrite API.

use declassify::{
    declassify, DeclassifyErrorKind, DeclassifyOptions, FormatOptions, IndentStyle, QuoteKind,
    SourceKind,
};
use pretty_assertions::assert_eq;

fn module(source: &str) -> String {
    declassify(source, SourceKind::Module, &DeclassifyOptions::default())
        .unwrap()
        .code
}

fn error_kind(source: &str) -> DeclassifyErrorKind {
    declassify(source, SourceKind::Module, &DeclassifyOptions::default())
        .unwrap_err()
        .kind
}

const HEADER: &str = "import { Component, Emit, Prop, PropSync, VModel, Watch, Vue } from 'vue-property-decorator'\n\n";

fn component(body: &str) -> String {
    format!("{HEADER}@Component\nexport default class Sample extends Vue {{\n{body}}}\n")
}

#[test]
fn test_data_fields_and_warnings() {
    let source = "import { Component, Mixins } from 'vue-property-decorator'
import Logger from './logger'

@Component
export default class Panel extends Mixins(Logger) {
  // collapsed by default
  collapsed = false
  items: string[] = []
  pending!: boolean

  get total() {
    return this.items.length
  }
}
";
    let output = declassify(source, SourceKind::Module, &DeclassifyOptions::default()).unwrap();
    assert_eq!(
        output.code,
        "import Logger from './logger'
import Vue from 'vue'

export default Vue.extend({
  name: 'Panel',
  mixins: [Logger],
  data() {
    return {
      // collapsed by default
      collapsed: false,
      items: [] as string[]
    }
  },
  computed: {
    total(): any {
      return this.items.length
    }
  }
})
"
    );
    let messages: Vec<String> = output.warnings.iter().map(ToString::to_string).collect();
    assert_eq!(
        messages,
        vec![
            "field `pending` has no initializer and was left out of data()".to_string(),
            "computed `total` has no return type annotation and was typed as `any`".to_string(),
        ]
    );
    let pending = output.warnings[0].span.unwrap();
    assert_eq!(pending.text(source), Some("pending!: boolean"));
}

#[test]
fn test_config_passthrough_and_name_override() {
    let source = "import Component from 'vue-class-component'
import Vue from 'vue'

@Component({
  name: 'custom-name',
  // registered children
  components: { Child },
  inheritAttrs: false,
})
export default class Ignored extends Vue {}
";
    assert_eq!(
        module(source),
        "import Vue from 'vue'

export default Vue.extend({
  name: 'custom-name',
  // registered children
  components: { Child },
  inheritAttrs: false
})
"
    );
}

#[test]
fn test_cast_initializers_are_parenthesized() {
    let source = component(
        "  cb: () => void = () => {}\n  n: number | null = a || b\n  label: string = 'x'\n",
    );
    assert!(module(&source).contains(
        "      cb: (() => {}) as () => void,\n      n: (a || b) as number | null,\n      label: 'x' as string\n"
    ));
}

#[test]
fn test_default_wins_over_required() {
    let source = component("  @Prop({ required: true, default: 1 }) readonly size!: number\n");
    let output = module(&source);
    assert!(output.contains("size: {\n      type: Number,\n      default: 1\n    }"));
    assert!(!output.contains("required"));
}

#[test]
fn test_reindents_to_requested_unit() {
    let source = "import { Component, Prop, Vue } from 'vue-property-decorator'

@Component
export default class Note extends Vue {
    @Prop({ default: '' }) readonly text!: string

    get html(): string {
        return `<p>
    ${this.text}
</p>`
    }
}
";
    let options = DeclassifyOptions {
        format: FormatOptions {
            indent: IndentStyle::Tab,
            quote: QuoteKind::Double,
            ..Default::default()
        },
    };
    let output = declassify(source, SourceKind::Module, &options).unwrap();
    assert_eq!(
        output.code,
        "import Vue from \"vue\"

export default Vue.extend({
\tname: \"Note\",
\tprops: {
\t\ttext: {
\t\t\ttype: String,
\t\t\tdefault: ''
\t\t}
\t},
\tcomputed: {
\t\thtml(): string {
\t\t\treturn `<p>
    ${this.text}
</p>`
\t\t}
\t}
})
"
    );
}

#[test]
fn test_getter_setter_pair() {
    let source = component(
        "  first = ''
  last = ''

  /** Full name. */
  get full(): string {
    return `${this.first} ${this.last}`
  }

  // splits on the first space
  set full(value: string) {
    ;[this.first, this.last] = value.split(' ')
  }
",
    );
    let output = module(&source);
    assert!(output.contains(
        "  computed: {
    /**
     * Full name.
     */
    full: {
      get(): string {
        return `${this.first} ${this.last}`
      },
      // splits on the first space
      set(value: string) {
        ;[this.first, this.last] = value.split(' ')
      }
    }
  }"
    ));
}

#[test]
fn test_synced_prop_with_dashed_target() {
    let source = component("  @PropSync('is-open') readonly opened!: boolean\n");
    let output = module(&source);
    assert!(output.contains("    'is-open': {\n      type: Boolean,\n      required: false\n    }"));
    assert!(output.contains("        return this['is-open']"));
    assert!(output.contains("        this.$emit('update:is-open', value)"));
}

#[test]
fn test_not_a_component() {
    assert!(matches!(
        error_kind("export const answer = 42\n"),
        DeclassifyErrorKind::NotAComponent { .. }
    ));
    assert!(matches!(
        error_kind("export default class Plain {}\n"),
        DeclassifyErrorKind::NotAComponent { .. }
    ));
    assert!(matches!(
        error_kind("export default { name: 'already-an-object' }\n"),
        DeclassifyErrorKind::NotAComponent { .. }
    ));
    assert!(matches!(
        error_kind("@Injectable()\nexport default class Service {}\n"),
        DeclassifyErrorKind::NotAComponent { .. }
    ));
}

#[test]
fn test_extra_class_decorator_is_rejected() {
    let source = format!("{HEADER}@Injectable()\n@Component\nexport default class Sample extends Vue {{}}\n");
    assert_eq!(
        error_kind(&source),
        DeclassifyErrorKind::UnsupportedDecorator {
            name: "Injectable".to_string()
        }
    );
}

#[test]
fn test_rejected_members() {
    assert_eq!(
        error_kind(&component("  @PropSync() value!: string\n")),
        DeclassifyErrorKind::MissingSyncTarget {
            field: "value".to_string()
        }
    );
    assert_eq!(
        error_kind(&component("  set total(value: number) {}\n")),
        DeclassifyErrorKind::IllegalDerivedSetter {
            name: "total".to_string()
        }
    );
    assert_eq!(
        error_kind(&component("  @VModel() a!: string\n  @VModel() b!: string\n")),
        DeclassifyErrorKind::DuplicateModelBinding {
            field: "b".to_string()
        }
    );
    assert_eq!(
        error_kind(&component("  @Prop() readonly data\n")),
        DeclassifyErrorKind::UntypedProp {
            name: "data".to_string()
        }
    );
    assert_eq!(
        error_kind(&component("  @Ref() readonly input!: HTMLInputElement\n")),
        DeclassifyErrorKind::UnsupportedDecorator {
            name: "Ref".to_string()
        }
    );
    assert!(matches!(
        error_kind(&component("  constructor() {\n    super()\n  }\n")),
        DeclassifyErrorKind::UnsupportedMember { .. }
    ));
    assert!(matches!(
        error_kind(&component("  static count = 0\n")),
        DeclassifyErrorKind::UnsupportedMember { .. }
    ));
}

#[test]
fn test_invalid_decorator_arguments() {
    assert!(matches!(
        error_kind(&component("  @Prop({ default() { return 1 } }) readonly n!: number\n")),
        DeclassifyErrorKind::InvalidPropArgument { .. }
    ));
    assert!(matches!(
        error_kind(&component("  @Prop(Number) readonly n!: number\n")),
        DeclassifyErrorKind::InvalidPropArgument { .. }
    ));
    assert!(matches!(
        error_kind(&component("  @Watch(path)\n  onChange() {}\n")),
        DeclassifyErrorKind::InvalidDecoratorArgument { .. }
    ));
    assert!(matches!(
        error_kind(&component("  @Emit(name)\n  send() {}\n")),
        DeclassifyErrorKind::InvalidDecoratorArgument { .. }
    ));
    let source = format!("{HEADER}@Component(options)\nexport default class Sample extends Vue {{}}\n");
    assert!(matches!(
        error_kind(&source),
        DeclassifyErrorKind::InvalidDecoratorArgument { .. }
    ));
}

#[test]
fn test_parse_error() {
    assert!(matches!(
        error_kind("export default class {"),
        DeclassifyErrorKind::Parse { .. }
    ));
}
