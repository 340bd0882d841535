//! Immersive session state as seen by the portals
//!
//! Session negotiation belongs to the platform; this resource only tracks
//! which presentation is active and applies enter/exit requests one frame
//! after they are made, which is when portals learn about an exit.

use bevy::prelude::*;
use portal_core::{ImmersiveKind, Signal};
use tracing::info;

use crate::host::PortalHost;

/// Requested change to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRequest {
    Enter(ImmersiveKind),
    Exit,
}

/// Completed change to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTransition {
    Entered(ImmersiveKind),
    Exited(ImmersiveKind),
}

#[derive(Resource, Debug, Default)]
pub struct ImmersiveSession {
    mode: Option<ImmersiveKind>,
    pending: Option<SessionRequest>,
}

impl ImmersiveSession {
    /// Active presentation, `None` for a flat scene
    pub fn mode(&self) -> Option<ImmersiveKind> {
        self.mode
    }

    pub fn pending(&self) -> Option<SessionRequest> {
        self.pending
    }

    pub fn request_enter(&mut self, kind: ImmersiveKind) {
        self.pending = Some(SessionRequest::Enter(kind));
    }

    pub fn request_exit(&mut self) {
        self.pending = Some(SessionRequest::Exit);
    }

    /// Apply the pending request. Switching kinds while in a session exits
    /// first, so the caller sees the exit before the next enter.
    pub fn advance(&mut self) -> Option<SessionTransition> {
        let request = self.pending.take()?;
        match (request, self.mode) {
            (SessionRequest::Exit, Some(kind)) => {
                self.mode = None;
                Some(SessionTransition::Exited(kind))
            }
            (SessionRequest::Exit, None) => None,
            (SessionRequest::Enter(kind), Some(current)) if kind == current => None,
            (SessionRequest::Enter(kind), Some(current)) => {
                self.mode = None;
                self.pending = Some(SessionRequest::Enter(kind));
                Some(SessionTransition::Exited(current))
            }
            (SessionRequest::Enter(kind), None) => {
                self.mode = Some(kind);
                Some(SessionTransition::Entered(kind))
            }
        }
    }
}

/// V enters VR, X enters AR, Escape leaves the session
pub(crate) fn session_keys(keyboard: Res<ButtonInput<KeyCode>>, mut session: ResMut<ImmersiveSession>) {
    if keyboard.just_pressed(KeyCode::KeyV) {
        session.request_enter(ImmersiveKind::Vr);
    } else if keyboard.just_pressed(KeyCode::KeyX) {
        session.request_enter(ImmersiveKind::Ar);
    } else if keyboard.just_pressed(KeyCode::Escape) {
        session.request_exit();
    }
}

/// Apply pending session requests and tell every portal about exits
pub(crate) fn advance_session(mut host: PortalHost) {
    match host.session.advance() {
        Some(SessionTransition::Entered(kind)) => {
            info!(mode = %kind, "Entered immersive session");
        }
        Some(SessionTransition::Exited(kind)) => {
            info!(mode = %kind, "Exited immersive session");
            for entity in host.portal_entities() {
                host.dispatch(entity, &Signal::ImmersiveExited);
            }
        }
        None => {}
    }
}
