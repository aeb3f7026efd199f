// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! Audit trail for marketplace actions.
//!
//! Every marketplace action (data added, access requested and decided,
//! feedback submitted, download performed, insight requested) emits one
//! [`AuditEvent`] to an append-only consensus topic. The JSON shape is
//! consumed by an external analytics pipeline and is frozen at the field
//! name level.

pub mod event;
pub mod recorder;

pub use event::{AuditEvent, AuditEventType};
pub use recorder::AuditRecorder;
