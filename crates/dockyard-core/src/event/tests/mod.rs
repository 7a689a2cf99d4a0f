// Event system test module
#[cfg(test)]
mod dispatcher_tests;

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::event::{EventResult, Message, MessageKind, MessageRouter};

    #[test]
    fn test_message_kind_default() {
        assert_eq!(MessageKind::default(), MessageKind::Info);
    }

    #[test]
    fn test_message_kind_ordering() {
        assert!(MessageKind::Debug < MessageKind::Info);
        assert!(MessageKind::Info < MessageKind::Warning);
        assert!(MessageKind::Warning < MessageKind::Error);
    }

    #[test]
    fn test_event_dispatch() {
        let router = MessageRouter::new();
        let root = router.add_root("host");
        let called = Rc::new(RefCell::new(false));
        let called_clone = called.clone();

        root.subscribe(move |_args| {
            *called_clone.borrow_mut() = true;
            EventResult::Continue
        })
        .unwrap();

        root.raise(Message::info("hello")).unwrap();

        assert!(*called.borrow(), "Handler should have been called");
    }
}
