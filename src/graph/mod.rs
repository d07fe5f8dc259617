//! The in-memory graph model: block instances and typed connections.
//!
//! The graph owns all structural invariants. Every mutator validates first and
//! mutates last, so a call that returns an error leaves the graph untouched.

use crate::error::{ConnectionRejection, GraphError};
use crate::history::{HistoryState, ViewTransform};
use crate::registry::Registry;
use ahash::AHashMap;
use std::collections::BTreeMap;
use tracing::debug;

mod block;
mod port;
mod value;

pub use block::*;
pub use port::*;
pub use value::*;

/// Block instances and connections of one editing session.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    blocks: BTreeMap<BlockId, BlockInstance>,
    connections: BTreeMap<ConnectionId, Connection>,
    /// Single-slot reference from each occupied In port to its connection.
    occupied: AHashMap<Port, ConnectionId>,
    next_block_id: u64,
    next_connection_id: u64,
}

impl Graph {
    pub fn new() -> Self {
        Self {
            next_block_id: 1,
            next_connection_id: 1,
            ..Default::default()
        }
    }

    /// Places a new block of `kind`, initialising its fields from the kind's defaults.
    pub fn add_block(
        &mut self,
        registry: &Registry,
        kind: &str,
        position: Position,
    ) -> Result<&BlockInstance, GraphError> {
        let definition = registry
            .get(kind)
            .ok_or_else(|| GraphError::UnknownKind(kind.to_string()))?;

        let id = self.allocate_block_id();
        let fields = definition
            .fields()
            .iter()
            .map(|(name, default)| (name.clone(), default.clone()))
            .collect();

        debug!(block = %id, kind, "block added");
        let block = BlockInstance {
            id,
            kind: kind.to_string(),
            fields,
            position,
        };
        Ok(self.blocks.entry(id).or_insert(block))
    }

    /// Removes a block and, first, every connection touching it.
    pub fn remove_block(&mut self, id: BlockId) -> Result<BlockInstance, GraphError> {
        if !self.blocks.contains_key(&id) {
            return Err(GraphError::BlockNotFound(id));
        }

        let incident: Vec<ConnectionId> = self
            .connections
            .values()
            .filter(|c| c.touches_block(id))
            .map(|c| c.id)
            .collect();
        for connection_id in &incident {
            self.disconnect(*connection_id);
        }

        debug!(block = %id, cascaded = incident.len(), "block removed");
        self.blocks.remove(&id).ok_or(GraphError::BlockNotFound(id))
    }

    /// Connects an Out port to an In port after validating every invariant.
    pub fn connect(
        &mut self,
        registry: &Registry,
        from: Port,
        to: Port,
    ) -> Result<&Connection, GraphError> {
        self.kind_of(registry, from.block)?;
        self.kind_of(registry, to.block)?;
        if let Err(reason) = self.validate_connection(registry, &from, &to) {
            debug!(%from, %to, code = reason.code(), "connection rejected");
            return Err(match reason {
                ConnectionRejection::InputOccupied { occupant } => {
                    GraphError::InputOccupied { port: to, occupant }
                }
                reason => GraphError::InvalidConnection { from, to, reason },
            });
        }

        let id = self.allocate_connection_id();
        debug!(connection = %id, %from, %to, "connected");
        self.occupied.insert(to.clone(), id);
        Ok(self
            .connections
            .entry(id)
            .or_insert(Connection { id, from, to }))
    }

    fn validate_connection(
        &self,
        registry: &Registry,
        from: &Port,
        to: &Port,
    ) -> Result<(), ConnectionRejection> {
        for port in [from, to] {
            let declared = self
                .kind_of(registry, port.block)
                .map(|kind| kind.has_port(port.direction, port.channel, &port.name))
                .unwrap_or(false);
            if !declared {
                return Err(ConnectionRejection::UnknownPort(port.clone()));
            }
        }
        if from.direction != Direction::Out || to.direction != Direction::In {
            return Err(ConnectionRejection::WrongDirection);
        }
        if from.channel != to.channel {
            return Err(ConnectionRejection::ChannelMismatch);
        }
        if from.block == to.block {
            return Err(ConnectionRejection::SelfConnection);
        }
        if let Some(existing) = self
            .connections
            .values()
            .find(|c| &c.from == from && &c.to == to)
        {
            return Err(ConnectionRejection::Duplicate {
                existing: existing.id,
            });
        }
        if let Some(occupant) = self.occupied.get(to) {
            return Err(ConnectionRejection::InputOccupied {
                occupant: *occupant,
            });
        }
        Ok(())
    }

    /// Removes a connection. Removing an absent connection is a no-op.
    pub fn disconnect(&mut self, id: ConnectionId) -> Option<Connection> {
        let connection = self.connections.remove(&id)?;
        if self.occupied.get(&connection.to) == Some(&id) {
            self.occupied.remove(&connection.to);
        }
        debug!(connection = %id, "disconnected");
        Some(connection)
    }

    /// Removes every connection touching exactly `port`.
    pub fn disconnect_all(&mut self, port: &Port) -> Vec<Connection> {
        let ids: Vec<ConnectionId> = self
            .connections
            .values()
            .filter(|c| c.touches_port(port))
            .map(|c| c.id)
            .collect();
        ids.into_iter().filter_map(|id| self.disconnect(id)).collect()
    }

    pub fn set_field(
        &mut self,
        id: BlockId,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<(), GraphError> {
        let block = self
            .blocks
            .get_mut(&id)
            .ok_or(GraphError::BlockNotFound(id))?;
        block.fields.insert(name.to_string(), value.into());
        Ok(())
    }

    pub fn move_block(&mut self, id: BlockId, position: Position) -> Result<(), GraphError> {
        let block = self
            .blocks
            .get_mut(&id)
            .ok_or(GraphError::BlockNotFound(id))?;
        block.position = position;
        Ok(())
    }

    /// Removes all blocks and connections. Id counters keep counting.
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.connections.clear();
        self.occupied.clear();
    }

    // --- Read accessors ---

    pub fn block(&self, id: BlockId) -> Option<&BlockInstance> {
        self.blocks.get(&id)
    }

    /// All blocks in creation order.
    pub fn blocks(&self) -> impl Iterator<Item = &BlockInstance> {
        self.blocks.values()
    }

    pub fn blocks_by_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a BlockInstance> {
        self.blocks.values().filter(move |b| b.kind == kind)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    /// All connections in creation order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    pub fn connections_from<'a>(&'a self, port: &'a Port) -> impl Iterator<Item = &'a Connection> {
        self.connections.values().filter(move |c| &c.from == port)
    }

    pub fn connections_to<'a>(&'a self, port: &'a Port) -> impl Iterator<Item = &'a Connection> {
        self.connections.values().filter(move |c| &c.to == port)
    }

    /// The connection occupying an In port, if any.
    pub fn occupant(&self, port: &Port) -> Option<&Connection> {
        self.occupied
            .get(port)
            .and_then(|id| self.connections.get(id))
    }

    /// The single incoming flow connection of a block, if any.
    pub fn incoming_flow(&self, id: BlockId) -> Option<&Connection> {
        self.occupant(&Port::flow_in(id))
    }

    /// The "next" flow-out connections of a block, in creation order.
    pub fn outgoing_flow(&self, id: BlockId) -> Vec<&Connection> {
        self.outgoing_branch(id, FLOW_NEXT)
    }

    /// The connections leaving a named branch slot, in creation order.
    pub fn outgoing_branch(&self, id: BlockId, slot: &str) -> Vec<&Connection> {
        self.connections
            .values()
            .filter(|c| {
                c.from.block == id && c.from.channel == Channel::Flow && c.from.name == slot
            })
            .collect()
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn next_block_id(&self) -> u64 {
        self.next_block_id
    }

    pub fn next_connection_id(&self) -> u64 {
        self.next_connection_id
    }

    // --- Snapshots ---

    /// Deep copy of the graph plus the view transform, suitable for history.
    pub fn snapshot(&self, view: ViewTransform) -> HistoryState {
        HistoryState {
            blocks: self.blocks.values().cloned().collect(),
            connections: self.connections.values().cloned().collect(),
            next_block_id: self.next_block_id,
            next_connection_id: self.next_connection_id,
            view,
        }
    }

    /// Rebuilds a graph from a snapshot against `registry`.
    ///
    /// Blocks are re-created under their original ids; each connection is
    /// re-resolved by block id, direction, channel and port name and goes
    /// through the normal `connect` validation.
    pub fn restore(state: &HistoryState, registry: &Registry) -> Result<Graph, GraphError> {
        let mut graph = Graph::new();

        for saved in &state.blocks {
            if !registry.contains(&saved.kind) {
                return Err(GraphError::UnknownKind(saved.kind.clone()));
            }
            if graph.blocks.contains_key(&saved.id) {
                return Err(GraphError::RestoreFailed(format!(
                    "block id {} appears twice",
                    saved.id
                )));
            }
            graph.blocks.insert(saved.id, saved.clone());
        }

        let mut saved_connections: Vec<&Connection> = state.connections.iter().collect();
        saved_connections.sort_by_key(|c| c.id);
        for saved in saved_connections {
            if saved.id.0 == 0 || graph.connections.contains_key(&saved.id) {
                return Err(GraphError::RestoreFailed(format!(
                    "connection id {} is reserved or appears twice",
                    saved.id
                )));
            }
            graph.next_connection_id = saved.id.0;
            graph.connect(registry, saved.from.clone(), saved.to.clone())?;
        }

        let max_block = graph.blocks.keys().next_back().map_or(0, |id| id.0);
        let max_connection = graph.connections.keys().next_back().map_or(0, |id| id.0);
        if state.next_block_id <= max_block || state.next_connection_id <= max_connection {
            return Err(GraphError::RestoreFailed(
                "id counters are behind the ids in use".to_string(),
            ));
        }
        graph.next_block_id = state.next_block_id;
        graph.next_connection_id = state.next_connection_id;

        debug!(
            blocks = graph.blocks.len(),
            connections = graph.connections.len(),
            "graph restored from snapshot"
        );
        Ok(graph)
    }

    fn kind_of<'r>(
        &self,
        registry: &'r Registry,
        id: BlockId,
    ) -> Result<&'r crate::registry::BlockKind, GraphError> {
        let block = self.blocks.get(&id).ok_or(GraphError::BlockNotFound(id))?;
        registry
            .get(&block.kind)
            .ok_or_else(|| GraphError::UnknownKind(block.kind.clone()))
    }

    fn allocate_block_id(&mut self) -> BlockId {
        let id = BlockId(self.next_block_id.max(1));
        self.next_block_id = id.0 + 1;
        id
    }

    fn allocate_connection_id(&mut self) -> ConnectionId {
        let id = ConnectionId(self.next_connection_id.max(1));
        self.next_connection_id = id.0 + 1;
        id
    }
}
