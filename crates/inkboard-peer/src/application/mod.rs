//! Application layer: use cases orchestrating the peer's three flows.
//!
//! Each use case depends only on domain types and infrastructure traits.
//! The [`session::Session`] task is the single owner of the replica store
//! and the render surface; use cases borrow them per call instead of
//! sharing them behind locks.

pub mod local_input;
pub mod remote_mirror;
pub mod render_frame;
pub mod session;

pub use local_input::{LocalAction, LocalInputUseCase};
pub use remote_mirror::{RemoteAction, RemoteMirrorUseCase};
pub use render_frame::RenderFrameUseCase;
pub use session::{Session, SessionError, SessionOptions};
