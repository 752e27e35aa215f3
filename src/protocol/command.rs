//! Command definitions
//!
//! Wire names of every command the client issues.

use std::fmt;

/// Commands known to the command table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    // Connection / server
    Auth,
    Select,
    Echo,
    Ping,
    Shutdown,
    Commands,

    // Keyspace
    Keys,
    Exists,
    Expire,
    Set,
    Get,
    Del,

    // Hashes
    HSet,
    HGet,
    HDel,
    HLen,
    HExists,

    // Lists
    LPush,
    RPush,
    LPop,
    RPop,
    LLen,
    LInsert,
    LIndex,
    LRange,
}

impl CommandName {
    /// Keyword as sent on the wire
    pub const fn as_str(&self) -> &'static str {
        match self {
            CommandName::Auth => "AUTH",
            CommandName::Select => "SELECT",
            CommandName::Echo => "ECHO",
            CommandName::Ping => "PING",
            CommandName::Shutdown => "SHUTDOWN",
            // Plural on the wire.
            CommandName::Commands => "COMMANDS",
            CommandName::Keys => "KEYS",
            CommandName::Exists => "EXISTS",
            CommandName::Expire => "EXPIRE",
            CommandName::Set => "SET",
            CommandName::Get => "GET",
            CommandName::Del => "DEL",
            CommandName::HSet => "HSET",
            CommandName::HGet => "HGET",
            CommandName::HDel => "HDEL",
            CommandName::HLen => "HLEN",
            CommandName::HExists => "HEXISTS",
            CommandName::LPush => "LPUSH",
            CommandName::RPush => "RPUSH",
            CommandName::LPop => "LPOP",
            CommandName::RPop => "RPOP",
            CommandName::LLen => "LLEN",
            CommandName::LInsert => "LINSERT",
            CommandName::LIndex => "LINDEX",
            CommandName::LRange => "LRANGE",
        }
    }
}

impl AsRef<[u8]> for CommandName {
    fn as_ref(&self) -> &[u8] {
        self.as_str().as_bytes()
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
