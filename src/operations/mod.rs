// SharedPlay operations - one module per document kind, all on SharedPlayInterface

pub mod comments;
pub mod invitations;
pub mod playlists;
pub mod reactions;
pub mod songs;
pub mod users;

pub use comments::CommentSource;
