//! After-send notification

use std::fmt;

use lettre::Message;

use crate::form::ContactForm;

/// Callback invoked after a successful delivery
pub type AfterSendListener = Box<dyn Fn(&Message, &ContactForm) + Send + Sync + 'static>;

/// Explicit list of callbacks fired once per successful delivery
///
/// There is no global registry: the listeners that can observe a form
/// are exactly the ones subscribed on that form. Listeners run
/// synchronously in subscription order, on the sending thread, after
/// the transport has accepted the message. A failed or skipped delivery
/// fires nothing.
///
/// # Examples
///
/// ```rust
/// use std::sync::{
///     atomic::{AtomicUsize, Ordering},
///     Arc,
/// };
///
/// use envelope::ContactForm;
///
/// let deliveries = Arc::new(AtomicUsize::new(0));
/// let seen = Arc::clone(&deliveries);
///
/// let mut form = ContactForm::new();
/// form.on_after_send(move |_message, _form| {
///     seen.fetch_add(1, Ordering::SeqCst);
/// });
/// assert_eq!(form.after_send().len(), 1);
/// ```
pub struct AfterSend {
    listeners: Vec<AfterSendListener>,
}

impl AfterSend {
    /// Creates an empty listener list
    pub fn new() -> Self {
        AfterSend {
            listeners: Vec::new(),
        }
    }

    /// Appends a listener
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&Message, &ContactForm) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Number of subscribed listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns true if no listener is subscribed
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub(crate) fn emit(&self, message: &Message, form: &ContactForm) {
        for listener in &self.listeners {
            listener(message, form);
        }
    }
}

impl Default for AfterSend {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AfterSend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AfterSend")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;

    use super::*;

    fn any_message() -> Message {
        Message::builder()
            .from("a@localhost".parse().unwrap())
            .to("b@localhost".parse().unwrap())
            .subject("x")
            .body(String::new())
            .unwrap()
    }

    #[test]
    fn listeners_run_in_subscription_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut after_send = AfterSend::new();

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            after_send.subscribe(move |_message, _form| {
                order.lock().unwrap().push(tag);
            });
        }

        after_send.emit(&any_message(), &ContactForm::new());

        assert_eq!(*order.lock().unwrap(), ["first", "second", "third"]);
        assert_eq!(after_send.len(), 3);
    }

    #[test]
    fn an_empty_list_emits_nothing() {
        let after_send = AfterSend::new();
        assert!(after_send.is_empty());

        after_send.emit(&any_message(), &ContactForm::new());
    }
}
