use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the single flow-in port every flow-capable block exposes.
pub const FLOW_IN: &str = "in";
/// Name of the primary ("what runs after me") flow-out port.
pub const FLOW_NEXT: &str = "next";

/// Identifies a block instance. Allocated monotonically and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u64);

/// Identifies a connection. Allocated monotonically and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub u64);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Flow,
    Data,
}

/// A derived address of an attachment point on a block.
///
/// Ports are not stored anywhere; whether a port is valid is decided by the
/// block's kind definition in the active registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Port {
    pub block: BlockId,
    pub direction: Direction,
    pub channel: Channel,
    pub name: String,
}

impl Port {
    pub fn new(block: BlockId, direction: Direction, channel: Channel, name: &str) -> Self {
        Self {
            block,
            direction,
            channel,
            name: name.to_string(),
        }
    }

    /// The flow-in port of a block.
    pub fn flow_in(block: BlockId) -> Self {
        Self::new(block, Direction::In, Channel::Flow, FLOW_IN)
    }

    /// The primary "next" flow-out port of a block.
    pub fn next(block: BlockId) -> Self {
        Self::new(block, Direction::Out, Channel::Flow, FLOW_NEXT)
    }

    /// A named branch flow-out (loop body, true arm, container children, ...).
    pub fn branch(block: BlockId, slot: &str) -> Self {
        Self::new(block, Direction::Out, Channel::Flow, slot)
    }

    pub fn data_in(block: BlockId, name: &str) -> Self {
        Self::new(block, Direction::In, Channel::Data, name)
    }

    pub fn data_out(block: BlockId, name: &str) -> Self {
        Self::new(block, Direction::Out, Channel::Data, name)
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            Direction::In => "in",
            Direction::Out => "out",
        };
        let channel = match self.channel {
            Channel::Flow => "flow",
            Channel::Data => "data",
        };
        write!(f, "{}.{}:{}:{}", self.block, channel, direction, self.name)
    }
}

/// A directed edge from an Out port to an In port on the same channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub from: Port,
    pub to: Port,
}

impl Connection {
    /// Whether either endpoint lives on `block`.
    pub fn touches_block(&self, block: BlockId) -> bool {
        self.from.block == block || self.to.block == block
    }

    /// Whether either endpoint is exactly `port`.
    pub fn touches_port(&self, port: &Port) -> bool {
        &self.from == port || &self.to == port
    }
}
