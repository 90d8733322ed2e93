//! Tests for #[derive(Action)] macro

use std::cell::RefCell;
use std::rc::Rc;

use reducer_actions::{Action, Dispatcher, Store};

#[derive(Action, Debug, Clone, PartialEq)]
#[action(dispatch)]
enum ListAction {
    Append(String),
    Pop,
    #[action(rename = "reset")]
    Reset,
    Splice {
        at: usize,
        value: String,
    },
    #[action(method = "replace_all")]
    SetAll(Vec<String>, String),
}

fn list_reducer(state: &Vec<String>, action: &ListAction) -> Option<Vec<String>> {
    let mut next = state.clone();
    match action {
        ListAction::Append(value) => next.push(value.clone()),
        ListAction::Pop => {
            next.pop()?;
        }
        ListAction::Reset => next.clear(),
        ListAction::Splice { at, value } => {
            if *at > next.len() {
                return None;
            }
            next.insert(*at, value.clone());
        }
        ListAction::SetAll(values, suffix) => {
            next = values.iter().map(|v| format!("{}{}", v, suffix)).collect();
        }
    }
    Some(next)
}

#[test]
fn test_names() {
    assert_eq!(ListAction::Append("a".into()).name(), "Append");
    assert_eq!(ListAction::Pop.name(), "Pop");
    assert_eq!(ListAction::Reset.name(), "reset");
    assert_eq!(
        ListAction::Splice {
            at: 0,
            value: "a".into()
        }
        .name(),
        "Splice"
    );
    assert_eq!(ListAction::SetAll(vec![], String::new()).name(), "SetAll");
}

#[test]
fn test_dispatch_trait_methods() {
    let store = Rc::new(Store::new(Vec::new(), list_reducer));
    let dispatcher = store.dispatcher();

    assert!(dispatcher.append("value".to_string()));
    assert!(dispatcher.append("value".to_string()));
    assert!(dispatcher.pop());
    assert_eq!(*store.state(), vec!["value"]);

    assert!(dispatcher.splice(0, "first".to_string()));
    assert_eq!(*store.state(), vec!["first", "value"]);

    // Reducer declines out-of-range splice
    assert!(!dispatcher.splice(10, "nope".to_string()));

    assert!(dispatcher.replace_all(vec!["a".into(), "b".into()], "!".into()));
    assert_eq!(*store.state(), vec!["a!", "b!"]);

    assert!(dispatcher.reset());
    assert!(store.state().is_empty());
    assert!(!dispatcher.pop());
}

#[test]
fn test_dispatch_after_store_dropped() {
    let store = Rc::new(Store::new(Vec::new(), list_reducer));
    let dispatcher: Dispatcher<Vec<String>, ListAction> = store.dispatcher();
    drop(store);

    assert!(!dispatcher.append("lost".to_string()));
}

#[test]
fn test_middleware_sees_derived_names() {
    struct Names(Rc<RefCell<Vec<String>>>);

    impl reducer_actions::Middleware<ListAction> for Names {
        fn before(&mut self, action: &ListAction) {
            self.0.borrow_mut().push(action.name().to_string());
        }

        fn after(&mut self, _action: &ListAction, _state_changed: bool) {}
    }

    let names = Rc::new(RefCell::new(Vec::new()));
    let store =
        Rc::new(Store::new(Vec::new(), list_reducer).with_middleware(Names(Rc::clone(&names))));
    let dispatcher = store.dispatcher();

    dispatcher.append("a".to_string());
    dispatcher.reset();

    assert_eq!(*names.borrow(), vec!["Append", "reset"]);
}

#[test]
fn test_generic_enum_name() {
    #[derive(Action, Debug)]
    enum Wrapped<T: std::fmt::Debug + 'static> {
        Set(T),
        Clear,
    }

    assert_eq!(Wrapped::Set(1_u8).name(), "Set");
    assert_eq!(Wrapped::<u8>::Clear.name(), "Clear");
}
