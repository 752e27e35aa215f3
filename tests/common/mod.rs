//! In-process fake GRedis server for integration tests
//!
//! Speaks enough of the protocol to exercise every client command. Each
//! accepted connection runs on its own thread; data is shared across
//! connections and split by database index.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use gredis::Options;
use regex::bytes::Regex;

// =============================================================================
// Server Setup
// =============================================================================

/// How the fake server treats its clients
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Password required before any other command (empty = none)
    pub password: String,
    /// Read commands but never answer them
    pub silent: bool,
    /// Number of databases SELECT accepts (`None` = unlimited)
    pub databases: Option<u32>,
}

/// Events reported by connection threads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// A client connection reached EOF or failed
    Disconnected,
    /// SHUTDOWN was received
    Shutdown,
}

pub struct FakeServer {
    pub addr: SocketAddr,
    events: Receiver<ServerEvent>,
}

impl FakeServer {
    pub fn start() -> Self {
        Self::with_config(ServerConfig::default())
    }

    pub fn with_password(password: &str) -> Self {
        Self::with_config(ServerConfig {
            password: password.to_string(),
            ..ServerConfig::default()
        })
    }

    pub fn with_databases(databases: u32) -> Self {
        Self::with_config(ServerConfig {
            databases: Some(databases),
            ..ServerConfig::default()
        })
    }

    pub fn silent() -> Self {
        Self::with_config(ServerConfig {
            silent: true,
            ..ServerConfig::default()
        })
    }

    pub fn with_config(config: ServerConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        let (tx, rx) = mpsc::channel();
        let store = Arc::new(Mutex::new(Store::default()));

        thread::spawn(move || {
            for stream in listener.incoming() {
                let stream = match stream {
                    Ok(stream) => stream,
                    Err(_) => break,
                };
                let config = config.clone();
                let store = Arc::clone(&store);
                let tx = tx.clone();
                thread::spawn(move || serve(stream, config, store, tx));
            }
        });

        FakeServer { addr, events: rx }
    }

    /// Options pointing at this server with short deadlines
    pub fn options(&self) -> Options {
        Options::builder()
            .host(self.addr.ip().to_string())
            .port(self.addr.port())
            .connect_timeout(Duration::from_secs(1))
            .read_timeout(Duration::from_secs(2))
            .write_timeout(Duration::from_secs(2))
            .build()
    }

    /// `gredis://` URL for this server with an optional password and db
    pub fn url(&self, password: Option<&str>, db: Option<u32>) -> String {
        let userinfo = password.map(|p| format!(":{}@", p)).unwrap_or_default();
        let path = db.map(|d| format!("/{}", d)).unwrap_or_default();
        format!("gredis://{}{}{}", userinfo, self.addr, path)
    }

    /// Wait for the next event from any connection
    pub fn next_event(&self, timeout: Duration) -> Option<ServerEvent> {
        self.events.recv_timeout(timeout).ok()
    }
}

// =============================================================================
// Data Model
// =============================================================================

enum Value {
    Str(Vec<u8>),
    Hash(HashMap<Vec<u8>, Vec<u8>>),
    List(VecDeque<Vec<u8>>),
}

#[derive(Default)]
struct Store {
    dbs: HashMap<u32, HashMap<Vec<u8>, Value>>,
}

enum Reply {
    Status(&'static str),
    Error(String),
    Int(i64),
    Bulk(Vec<u8>),
    Nil,
    Array(Vec<Vec<u8>>),
}

const WRONGTYPE: &str = "WRONGTYPE Operation against a key holding the wrong kind of value";

const COMMANDS: &[&str] = &[
    "AUTH", "SELECT", "ECHO", "PING", "SHUTDOWN", "COMMANDS", "KEYS", "EXISTS", "EXPIRE", "SET",
    "GET", "DEL", "HSET", "HGET", "HDEL", "HLEN", "HEXISTS", "LPUSH", "RPUSH", "LPOP", "RPOP",
    "LLEN", "LINSERT", "LINDEX", "LRANGE",
];

// =============================================================================
// Connection Handling
// =============================================================================

fn serve(stream: TcpStream, config: ServerConfig, store: Arc<Mutex<Store>>, tx: Sender<ServerEvent>) {
    let mut writer = stream.try_clone().expect("clone");
    let mut reader = BufReader::new(stream);
    let mut authed = config.password.is_empty();
    let mut db = 0u32;

    loop {
        let args = match read_command(&mut reader) {
            Ok(Some(args)) if !args.is_empty() => args,
            _ => {
                let _ = tx.send(ServerEvent::Disconnected);
                return;
            }
        };

        if config.silent {
            continue;
        }

        let name = String::from_utf8_lossy(&args[0]).to_uppercase();
        if name == "SHUTDOWN" {
            let _ = tx.send(ServerEvent::Shutdown);
            return;
        }

        let reply = if name == "AUTH" {
            if args.len() == 2 && args[1] == config.password.as_bytes() {
                authed = true;
                Reply::Status("OK")
            } else {
                Reply::Error("ERR invalid password".to_string())
            }
        } else if !authed {
            Reply::Error("NOAUTH Authentication required".to_string())
        } else if name == "SELECT" {
            let in_range = |i: &i64| *i >= 0 && config.databases.map_or(true, |n| *i < i64::from(n));
            match args.get(1).and_then(|a| parse_int(a)).filter(in_range) {
                Some(index) => {
                    db = index as u32;
                    Reply::Status("OK")
                }
                None => Reply::Error("ERR invalid DB index".to_string()),
            }
        } else {
            let mut guard = store.lock().expect("store");
            let data = guard.dbs.entry(db).or_default();
            execute(&name, &args[1..], data)
        };

        if write_reply(&mut writer, &reply).is_err() {
            let _ = tx.send(ServerEvent::Disconnected);
            return;
        }
    }
}

fn execute(name: &str, args: &[Vec<u8>], data: &mut HashMap<Vec<u8>, Value>) -> Reply {
    let arity_ok = match name {
        "PING" | "COMMANDS" => true,
        "ECHO" | "KEYS" | "GET" | "HLEN" | "LPOP" | "RPOP" | "LLEN" => args.len() == 1,
        "EXISTS" | "DEL" => !args.is_empty(),
        "EXPIRE" | "SET" | "HGET" | "HEXISTS" | "LINDEX" => args.len() == 2,
        "HSET" | "LRANGE" => args.len() == 3,
        "HDEL" | "LPUSH" | "RPUSH" => args.len() >= 2,
        "LINSERT" => args.len() == 4,
        _ => return Reply::Error(format!("ERR unknown command '{}'", name)),
    };
    if !arity_ok {
        return Reply::Error(format!("ERR wrong number of arguments for '{}'", name));
    }

    match name {
        "PING" => Reply::Status("PONG"),
        "ECHO" => Reply::Bulk(args[0].clone()),
        "COMMANDS" => Reply::Array(COMMANDS.iter().map(|c| c.as_bytes().to_vec()).collect()),
        "KEYS" => keys(&args[0], data),
        "EXISTS" => Reply::Int(args.iter().filter(|k| data.contains_key(*k)).count() as i64),
        "DEL" => Reply::Int(args.iter().filter(|k| data.remove(*k).is_some()).count() as i64),
        "EXPIRE" => match parse_int(&args[1]) {
            Some(_) => Reply::Int(data.contains_key(&args[0]) as i64),
            None => Reply::Error("ERR value is not an integer".to_string()),
        },
        "SET" => {
            data.insert(args[0].clone(), Value::Str(args[1].clone()));
            Reply::Status("OK")
        }
        "GET" => match data.get(&args[0]) {
            Some(Value::Str(value)) => Reply::Bulk(value.clone()),
            Some(_) => Reply::Error(WRONGTYPE.to_string()),
            None => Reply::Nil,
        },
        "HSET" | "HGET" | "HDEL" | "HLEN" | "HEXISTS" => hash_command(name, args, data),
        _ => list_command(name, args, data),
    }
}

fn keys(pattern: &[u8], data: &HashMap<Vec<u8>, Value>) -> Reply {
    // Regex error text spans several lines; keep the reply on one.
    let regex = match std::str::from_utf8(pattern).ok().and_then(|p| Regex::new(p).ok()) {
        Some(regex) => regex,
        None => return Reply::Error("ERR invalid regular expression".to_string()),
    };

    let mut matched: Vec<Vec<u8>> = data
        .keys()
        .filter(|key| regex.is_match(key))
        .cloned()
        .collect();
    matched.sort();
    Reply::Array(matched)
}

fn hash_command(name: &str, args: &[Vec<u8>], data: &mut HashMap<Vec<u8>, Value>) -> Reply {
    if name == "HSET" {
        let entry = data
            .entry(args[0].clone())
            .or_insert_with(|| Value::Hash(HashMap::new()));
        return match entry {
            Value::Hash(hash) => {
                Reply::Int(hash.insert(args[1].clone(), args[2].clone()).is_none() as i64)
            }
            _ => Reply::Error(WRONGTYPE.to_string()),
        };
    }

    let hash = match data.get_mut(&args[0]) {
        Some(Value::Hash(hash)) => hash,
        Some(_) => return Reply::Error(WRONGTYPE.to_string()),
        None => {
            return match name {
                "HGET" => Reply::Nil,
                _ => Reply::Int(0),
            }
        }
    };

    match name {
        "HGET" => hash.get(&args[1]).cloned().map_or(Reply::Nil, Reply::Bulk),
        "HDEL" => Reply::Int(args[1..].iter().filter(|f| hash.remove(*f).is_some()).count() as i64),
        "HLEN" => Reply::Int(hash.len() as i64),
        _ => Reply::Int(hash.contains_key(&args[1]) as i64),
    }
}

fn list_command(name: &str, args: &[Vec<u8>], data: &mut HashMap<Vec<u8>, Value>) -> Reply {
    if name == "LPUSH" || name == "RPUSH" {
        let entry = data
            .entry(args[0].clone())
            .or_insert_with(|| Value::List(VecDeque::new()));
        let list = match entry {
            Value::List(list) => list,
            _ => return Reply::Error(WRONGTYPE.to_string()),
        };
        for value in &args[1..] {
            if name == "LPUSH" {
                list.push_front(value.clone());
            } else {
                list.push_back(value.clone());
            }
        }
        return Reply::Int(list.len() as i64);
    }

    let list = match data.get_mut(&args[0]) {
        Some(Value::List(list)) => list,
        Some(_) => return Reply::Error(WRONGTYPE.to_string()),
        None => {
            return match name {
                "LLEN" | "LINSERT" => Reply::Int(0),
                "LRANGE" => Reply::Array(Vec::new()),
                _ => Reply::Nil,
            }
        }
    };

    match name {
        "LPOP" => list.pop_front().map_or(Reply::Nil, Reply::Bulk),
        "RPOP" => list.pop_back().map_or(Reply::Nil, Reply::Bulk),
        "LLEN" => Reply::Int(list.len() as i64),
        "LINSERT" => {
            let upper = args[1].to_ascii_uppercase();
            let after = match upper.as_slice() {
                b"BEFORE" => false,
                b"AFTER" => true,
                _ => return Reply::Error("ERR syntax error".to_string()),
            };
            match list.iter().position(|v| *v == args[2]) {
                Some(pos) => {
                    list.insert(if after { pos + 1 } else { pos }, args[3].clone());
                    Reply::Int(list.len() as i64)
                }
                None => Reply::Int(-1),
            }
        }
        "LINDEX" => match parse_int(&args[1]) {
            Some(index) => resolve_index(index, list.len())
                .and_then(|idx| list.get(idx).cloned())
                .map_or(Reply::Nil, Reply::Bulk),
            None => Reply::Error("ERR value is not an integer".to_string()),
        },
        _ => match (parse_int(&args[1]), parse_int(&args[2])) {
            (Some(start), Some(stop)) => {
                let len = list.len() as i64;
                let start = if start < 0 { (len + start).max(0) } else { start };
                let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
                if start > stop || start >= len {
                    Reply::Array(Vec::new())
                } else {
                    Reply::Array(
                        list.iter()
                            .skip(start as usize)
                            .take((stop - start + 1) as usize)
                            .cloned()
                            .collect(),
                    )
                }
            }
            _ => Reply::Error("ERR value is not an integer".to_string()),
        },
    }
}

fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let idx = if index < 0 { len + index } else { index };
    if (0..len).contains(&idx) {
        Some(idx as usize)
    } else {
        None
    }
}

fn parse_int(data: &[u8]) -> Option<i64> {
    std::str::from_utf8(data).ok()?.parse().ok()
}

// =============================================================================
// Wire Helpers
// =============================================================================

fn read_command(reader: &mut BufReader<TcpStream>) -> std::io::Result<Option<Vec<Vec<u8>>>> {
    let mut line = Vec::new();
    if !read_line(reader, &mut line)? {
        return Ok(None);
    }
    if line.first() != Some(&b'*') {
        return Err(invalid("expected array"));
    }
    let count = parse_usize(&line[1..])?;
    let mut args = Vec::with_capacity(count);
    for _ in 0..count {
        if !read_line(reader, &mut line)? {
            return Ok(None);
        }
        if line.first() != Some(&b'$') {
            return Err(invalid("expected bulk"));
        }
        let len = parse_usize(&line[1..])?;
        let mut data = vec![0u8; len + 2];
        reader.read_exact(&mut data)?;
        data.truncate(len);
        args.push(data);
    }
    Ok(Some(args))
}

fn read_line(reader: &mut BufReader<TcpStream>, buf: &mut Vec<u8>) -> std::io::Result<bool> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(false);
    }
    if buf.len() < 2 || buf[buf.len() - 2] != b'\r' {
        return Err(invalid("invalid line"));
    }
    buf.truncate(buf.len() - 2);
    Ok(true)
}

fn parse_usize(data: &[u8]) -> std::io::Result<usize> {
    std::str::from_utf8(data)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| invalid("invalid length"))
}

fn invalid(msg: &str) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, msg.to_string())
}

fn write_reply(stream: &mut TcpStream, reply: &Reply) -> std::io::Result<()> {
    let mut out = Vec::new();
    match reply {
        Reply::Status(text) => out.extend_from_slice(format!("+{}\r\n", text).as_bytes()),
        Reply::Error(text) => out.extend_from_slice(format!("-{}\r\n", text).as_bytes()),
        Reply::Int(value) => out.extend_from_slice(format!(":{}\r\n", value).as_bytes()),
        Reply::Nil => out.extend_from_slice(b"$-1\r\n"),
        Reply::Bulk(data) => push_bulk(&mut out, data),
        Reply::Array(items) => {
            out.extend_from_slice(format!("*{}\r\n", items.len()).as_bytes());
            for item in items {
                push_bulk(&mut out, item);
            }
        }
    }
    stream.write_all(&out)?;
    stream.flush()
}

fn push_bulk(out: &mut Vec<u8>, data: &[u8]) {
    out.extend_from_slice(format!("${}\r\n", data.len()).as_bytes());
    out.extend_from_slice(data);
    out.extend_from_slice(b"\r\n");
}
