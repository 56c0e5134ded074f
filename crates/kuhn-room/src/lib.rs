mod channel;
mod event;
mod message;
mod protocol;
mod waiting_room;

pub use channel::{PlayerChannel, PlayerSender};
pub use event::{Event, GameResult};
pub use message::ServerMessage;
pub use protocol::{Intake, Protocol, ProtocolError};
pub use waiting_room::{RoomError, WaitingRoom};
