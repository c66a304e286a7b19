//! Protocol Module
//!
//! Defines the git-annex external special remote line protocol.
//!
//! ## Line Format
//! ```text
//! COMMAND [param]* [last-param-with-spaces]
//! ```
//!
//! ### Host Queries (remote → host)
//! - `DIRHASH`, `DIRHASH-LOWER`, `GETCONFIG`, `GETUUID`, `GETGITDIR`,
//!   `GETWANTED`, `GETSTATE` - reply: `VALUE <text>`
//! - `GETCREDS` - reply: `CREDS <user> <password>`
//! - `GETURLS` - reply: `VALUE` lines ending with a bare `VALUE`
//! - `SETCONFIG`, `SETCREDS`, `SETWANTED`, `SETSTATE`, `SETURLPRESENT`,
//!   `SETURLMISSING`, `SETURIPRESENT`, `SETURIMISSING`, `PROGRESS`,
//!   `DEBUG`, `INFO`, `ERROR` - no reply
//!
//! ### Host Commands (host → remote)
//! See `INBOUND_COMMANDS` for names and arities.

mod codec;
mod command;
mod response;

pub use codec::{
    decode, decode_creds, decode_list_item, decode_value, decode_value_list, encode,
    encode_message, split_command, CREDS, SEPARATOR, VALUE,
};
pub use command::{inbound_arity, Direction, Message, INBOUND_COMMANDS};
pub use response::{
    Availability, ConfigField, Credentials, HostReply, InfoField, Reply, ReplyShape,
    UrlContents,
};
