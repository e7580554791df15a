use pretty_assertions::assert_eq;
use proptest::prelude::*;
use speckle::{
    analyzer::{Construct, SpecParser, StructuralError},
    HookKind, Suite,
};

const CALCULATOR: &str = r#"
// arithmetic helpers
describe 'calculator'
  before
    let total = 0
  end

  after_each
    let total = 0
  end

  it 'starts empty'
    total.should_eql 0
  end

  it 'is pending'
  end
end

describe 'strings'
  it 'has a length'
    'abc'.should_have_length 3
  end
end
"#;

#[test]
fn it_parses_suites_specs_and_hooks() {
    let registry = SpecParser::new().parse(CALCULATOR).unwrap();

    assert_eq!(
        registry.descriptions().collect::<Vec<_>>(),
        vec!["calculator", "strings"]
    );

    let calculator = registry.get("calculator").unwrap();
    let specs: Vec<_> = calculator
        .specs()
        .iter()
        .map(|s| s.description.as_str())
        .collect();
    assert_eq!(specs, vec!["starts empty", "is pending"]);
    assert_eq!(calculator.hook(HookKind::Before), Some("\n    let total = 0\n  "));
    assert_eq!(calculator.hook(HookKind::AfterEach), Some("\n    let total = 0\n  "));
    assert_eq!(calculator.hook(HookKind::BeforeEach), None);
    assert_eq!(calculator.specs()[0].body, "\n    total.should_eql 0\n  ");
}

#[test]
fn it_stops_at_end_marker() {
    let source = "describe 'kept' it 'a' end end\n__END__\ndescribe 'dropped' it 'b' end end";
    let registry = SpecParser::new().parse(source).unwrap();
    assert_eq!(registry.descriptions().collect::<Vec<_>>(), vec!["kept"]);
}

#[test]
fn it_reports_structural_errors() {
    let parser = SpecParser::new();

    let err = parser
        .parse("describe 'a'\n  it 'b'\n    1.should_eql 1\n")
        .unwrap_err();
    assert!(matches!(
        err,
        StructuralError::Unterminated {
            construct: Construct::It,
            ..
        }
    ));
    assert_eq!(err.span().line, 2);

    assert!(matches!(
        parser.parse("describe 'a' end end").unwrap_err(),
        StructuralError::UnmatchedEnd { .. }
    ));
    assert!(matches!(
        parser.parse("before x end").unwrap_err(),
        StructuralError::OutsideSuite { .. }
    ));
}

#[test]
fn it_keeps_keyword_lookalikes_inside_bodies() {
    let source = "describe 'words'\n  it 'sees friend and send'\n    let friend = 'send'\n  end\nend";
    let registry = SpecParser::new().parse(source).unwrap();
    assert_eq!(
        registry.get("words").unwrap().specs()[0].body,
        "\n    let friend = 'send'\n  "
    );
}

fn render(suites: &[(String, Vec<(String, String)>)]) -> String {
    let mut source = String::new();
    for (description, specs) in suites {
        source.push_str(&format!("describe '{}'\n", description));
        for (spec, body) in specs {
            source.push_str(&format!("  it '{}' {}\n  end\n", spec, body));
        }
        source.push_str("end\n");
    }
    source
}

fn suites_strategy() -> impl Strategy<Value = Vec<(String, Vec<(String, String)>)>> {
    prop::collection::vec(
        (
            "[a-z]{1,8}",
            prop::collection::vec(("[a-z ]{1,10}", "[0-9 ;]{0,12}"), 0..4),
        ),
        0..4,
    )
}

proptest! {
    #[test]
    fn parsing_is_idempotent(suites in suites_strategy()) {
        let source = render(&suites);
        let parser = SpecParser::new();

        let first: Vec<Suite> = parser.parse(&source).unwrap().iter().cloned().collect();
        let second: Vec<Suite> = parser.parse(&source).unwrap().iter().cloned().collect();
        prop_assert_eq!(&first, &second);

        let total: usize = suites.iter().map(|(_, specs)| specs.len()).sum();
        let parsed: usize = first.iter().map(|s| s.specs().len()).sum();
        prop_assert_eq!(total, parsed);
    }

    #[test]
    fn spec_bodies_survive_verbatim(body in "[0-9 ;]{0,12}") {
        let source = format!("describe 's'\n  it 'p' {}\n  end\nend\n", body);
        let registry = SpecParser::new().parse(&source).unwrap();
        prop_assert_eq!(
            registry.get("s").unwrap().specs()[0].body.clone(),
            format!(" {}\n  ", body)
        );
    }
}
