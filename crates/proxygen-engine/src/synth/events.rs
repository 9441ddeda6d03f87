//! Event forwarding
//!
//! Each source event gets a public event on the proxy, a `Raise<Event>`
//! method firing it with a null sender, and a constructor statement hooking a
//! boundary-safe delegate wrapper around that method to the source event.

use crate::diagnostics::{Diagnostic, EVENTS_UNSUPPORTED};
use crate::model::EventInfo;
use crate::types::TypeRef;
use crate::unit::{Event, Expr, Method, Param, Stmt};

use super::session::Session;

const EVENT_HANDLER: &str = "System.EventHandler";

impl Session<'_, '_> {
    pub(super) fn add_events(&mut self, events: &[EventInfo]) {
        if events.is_empty() {
            return;
        }
        if self.wrapped_member().is_some() {
            let message = format!(
                "{}: {} event(s) not forwarded; registry-member proxies do not support events",
                self.wrapped_type,
                events.len()
            );
            self.diagnose(Diagnostic::warning(message).with_code(EVENTS_UNSUPPORTED));
            return;
        }

        for event in events {
            self.forward_event(event);
        }
    }

    fn forward_event(&mut self, event: &EventInfo) {
        let handler_type = match &event.payload {
            Some(payload) => TypeRef::generic(EVENT_HANDLER, vec![payload.clone()]),
            None => TypeRef::new(EVENT_HANDLER),
        };
        self.unit.push_event(Event {
            name: event.name.clone(),
            handler_type,
        });

        let raise_name = format!("Raise{}", event.name);
        let mut raise = Method::new(raise_name.clone(), TypeRef::void());
        let payload_arg = match &event.payload {
            Some(payload) => {
                let name = self.unit.next_name();
                raise.params.push(Param::new(name.clone(), payload.clone()));
                Expr::Arg(name)
            }
            None => Expr::Null,
        };
        raise.body.push(Stmt::Raise {
            event: event.name.clone(),
            args: vec![Expr::Null, payload_arg],
        });
        self.push_method(raise);

        let proxy_type = match &event.payload {
            Some(payload) => TypeRef::generic(self.profile.event_proxy.clone(), vec![payload.clone()]),
            None => TypeRef::new(self.profile.event_proxy.clone()),
        };
        self.unit.add_constructor_statement(Stmt::Attach {
            target: self.wrapped.expr(),
            event: event.name.clone(),
            handler: Expr::New {
                ty: proxy_type,
                args: vec![Expr::MethodRef(raise_name)],
            },
        });
    }
}
