
#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::event::{EventResult, Message, MessageEventArgs, MessageRouter};
    use crate::ui_bridge::{MessageSink, StatusLog, UiBridge, UiBridgeError};

    struct FailingSink {
        attempts: Rc<RefCell<u32>>,
    }

    impl MessageSink for FailingSink {
        fn name(&self) -> &str {
            "failing"
        }

        fn handle_message(&mut self, args: &MessageEventArgs<'_>) -> Result<(), UiBridgeError> {
            *self.attempts.borrow_mut() += 1;
            Err(UiBridgeError::SinkFailed {
                sink_name: "failing".to_string(),
                kind: args.message.kind().to_string(),
                message: "display unavailable".to_string(),
            })
        }
    }

    #[test]
    fn test_attached_sink_sees_handled_messages() {
        let router = MessageRouter::new();
        let root = router.add_root("host");
        let child = root.add_child("plugin").unwrap();
        child.subscribe(|_| EventResult::Handled).unwrap();

        let log = StatusLog::new(10);
        let mut bridge = UiBridge::new(router.clone());
        bridge.attach(Box::new(log.clone())).unwrap();

        child.raise(Message::warning("swallowed by plugin")).unwrap();

        let entries = log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "swallowed by plugin");
        assert_eq!(entries[0].origin, child.id());
    }

    #[test]
    fn test_duplicate_sink_name_rejected() {
        let router = MessageRouter::new();
        let mut bridge = UiBridge::new(router);
        bridge.attach(Box::new(StatusLog::new(1))).unwrap();

        let err = bridge.attach(Box::new(StatusLog::new(1))).unwrap_err();
        assert!(matches!(err, UiBridgeError::DuplicateSink(ref name) if name == StatusLog::NAME));
    }

    #[test]
    fn test_detach_stops_delivery() {
        let router = MessageRouter::new();
        let root = router.add_root("host");
        let log = StatusLog::new(10);
        let mut bridge = UiBridge::new(router.clone());
        bridge.attach(Box::new(log.clone())).unwrap();

        root.raise(Message::info("one")).unwrap();
        bridge.detach(StatusLog::NAME).unwrap();
        root.raise(Message::info("two")).unwrap();

        assert_eq!(log.len(), 1);
        assert!(bridge.sink_names().is_empty());
        assert!(matches!(
            bridge.detach(StatusLog::NAME),
            Err(UiBridgeError::SinkNotFound(_))
        ));
    }

    #[test]
    fn test_failing_sink_does_not_break_dispatch() {
        let router = MessageRouter::new();
        let root = router.add_root("host");
        let attempts = Rc::new(RefCell::new(0));
        let log = StatusLog::new(10);
        let mut bridge = UiBridge::new(router.clone());
        bridge
            .attach(Box::new(FailingSink { attempts: attempts.clone() }))
            .unwrap();
        bridge.attach(Box::new(log.clone())).unwrap();

        root.raise(Message::error("boom")).unwrap();
        root.raise(Message::error("again")).unwrap();

        assert_eq!(*attempts.borrow(), 2);
        assert_eq!(log.len(), 2);
        assert_eq!(bridge.sink_names(), vec!["failing", StatusLog::NAME]);
    }

    #[test]
    fn test_detach_all() {
        let router = MessageRouter::new();
        let root = router.add_root("host");
        let log = StatusLog::new(10);
        let mut bridge = UiBridge::new(router.clone());
        bridge.attach(Box::new(log.clone())).unwrap();

        bridge.detach_all();
        root.raise(Message::info("unseen")).unwrap();

        assert!(log.is_empty());
    }
}
