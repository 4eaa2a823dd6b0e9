use proptest::prelude::*;

use nscope::ScopeStack;

const PREFIXES: &[&str] = &["", "a", "b"];
const URIS: &[&str] = &["urn:x", "urn:y", "urn:z"];

#[derive(Debug, Clone)]
enum Op {
    Push,
    Pop,
    Declare(&'static str, &'static str),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Push),
        Just(Op::Pop),
        (prop::sample::select(PREFIXES), prop::sample::select(URIS))
            .prop_map(|(prefix, uri)| Op::Declare(prefix, uri)),
    ]
}

type Frames = Vec<Vec<(&'static str, &'static str)>>;

// innermost, most recent declaration wins
fn model_uri(frames: &Frames, prefix: &str) -> Option<&'static str> {
    frames
        .iter()
        .rev()
        .flat_map(|frame| frame.iter().rev())
        .find(|(p, _)| *p == prefix)
        .map(|(_, uri)| *uri)
}

fn apply(stack: &mut ScopeStack, frames: &mut Frames, op: &Op) {
    match op {
        Op::Push => {
            stack.push_context();
            frames.push(vec![]);
        }
        Op::Pop => {
            if frames.len() > 1 {
                stack.pop_context();
                frames.pop();
            }
        }
        Op::Declare(prefix, uri) => {
            assert!(stack.declare_prefix(prefix, uri));
            frames.last_mut().unwrap().push((*prefix, *uri));
        }
    }
}

proptest! {
    #[test]
    fn stack_matches_model(ops in prop::collection::vec(arb_op(), 0..60)) {
        let mut stack = ScopeStack::new();
        let mut frames: Frames = vec![vec![]];
        for op in &ops {
            apply(&mut stack, &mut frames, op);
            prop_assert_eq!(stack.depth(), frames.len() - 1);
            for prefix in ["a", "b"] {
                let expected = model_uri(&frames, prefix);
                prop_assert_eq!(stack.get_uri(prefix), expected);
                let qname = format!("{}:x", prefix);
                let resolved = stack.process_name(&qname, false).map(|name| name.uri().to_string());
                prop_assert_eq!(resolved, expected.map(|uri| uri.to_string()));
            }
            let default = model_uri(&frames, "").unwrap_or("");
            let element = stack.process_name("x", false).unwrap();
            prop_assert_eq!(element.uri(), default);
            let attribute = stack.process_name("x", true).unwrap();
            prop_assert_eq!(attribute.uri(), "");
        }
    }

    #[test]
    fn reset_restores_initial_state(ops in prop::collection::vec(arb_op(), 0..60)) {
        let mut stack = ScopeStack::new();
        let mut frames: Frames = vec![vec![]];
        for op in &ops {
            apply(&mut stack, &mut frames, op);
        }
        stack.reset();
        prop_assert_eq!(stack.depth(), 0);
        prop_assert_eq!(stack.get_prefixes().collect::<Vec<_>>(), vec!["xml"]);
        prop_assert_eq!(stack.get_uri(""), None);

        // recycled scopes carry nothing over
        let mut frames: Frames = vec![vec![]];
        for op in &ops {
            apply(&mut stack, &mut frames, op);
            for prefix in ["a", "b"] {
                prop_assert_eq!(stack.get_uri(prefix), model_uri(&frames, prefix));
            }
        }
    }
}
