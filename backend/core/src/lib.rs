pub mod error;
pub mod message;
pub mod persona;

pub use error::MentorError;
pub use message::{
    last_user_content, trailing_window, AttachedFile, ConversationMessage, Role, TurnMessage,
    TURN_WINDOW,
};
pub use persona::{Persona, PersonaProfile};
