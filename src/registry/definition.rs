use super::template::{BlockContext, CodeTemplate, NestedFn, StatementFn, ValueFn};
use crate::graph::{Channel, Direction, FLOW_IN, FLOW_NEXT, Value};
use std::sync::Arc;

/// A declared data input and how it falls back when nothing is connected.
#[derive(Debug, Clone, PartialEq)]
pub struct DataInput {
    pub name: String,
    /// Field whose text is used when the input is unconnected.
    pub field: Option<String>,
    /// Literal used when the input is unconnected and the field is blank.
    pub default: String,
    /// Quote the field text as a string literal when it is used as the fallback.
    pub quoted: bool,
}

impl DataInput {
    /// An input that falls back to the field of the same name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            field: Some(name.to_string()),
            default: String::new(),
            quoted: false,
        }
    }

    /// An input with no literal field at all; only the declared default applies.
    pub fn connected_only(name: &str) -> Self {
        Self {
            field: None,
            ..Self::new(name)
        }
    }

    pub fn field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    pub fn default(mut self, default: &str) -> Self {
        self.default = default.to_string();
        self
    }

    pub fn quoted(mut self) -> Self {
        self.quoted = true;
        self
    }
}

/// Decides which container children are "members" (methods, properties) as
/// opposed to plain statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discriminator {
    pub members: Vec<String>,
}

impl Discriminator {
    pub fn is_member(&self, kind: &str) -> bool {
        self.members.iter().any(|m| m == kind)
    }
}

/// Structural shape of a block kind, fixed when the kind is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockShape {
    /// No nested code; the template takes only the block.
    Plain,
    /// One nested fragment per slot (if/else arms, loop body, try/catch/finally).
    Branching { slots: Vec<String> },
    /// A single children slot, optionally partitioned into members and statements.
    Container {
        slot: String,
        partition: Option<Discriminator>,
    },
}

impl BlockShape {
    /// The branch slot names, in declaration order.
    pub fn slots(&self) -> Vec<&str> {
        match self {
            BlockShape::Plain => Vec::new(),
            BlockShape::Branching { slots } => slots.iter().map(String::as_str).collect(),
            BlockShape::Container { slot, .. } => vec![slot.as_str()],
        }
    }

    pub fn is_nested(&self) -> bool {
        !matches!(self, BlockShape::Plain)
    }
}

/// A registry entry: ports, fields, shape and code templates of one block kind.
#[derive(Debug, Clone)]
pub struct BlockKind {
    id: String,
    label: String,
    category: String,
    flow_in: bool,
    flow_out: bool,
    shape: BlockShape,
    data_inputs: Vec<DataInput>,
    data_outputs: Vec<String>,
    fields: Vec<(String, Value)>,
    code: Option<CodeTemplate>,
    value: Option<ValueTemplate>,
}

#[derive(Clone)]
struct ValueTemplate(ValueFn);

impl std::fmt::Debug for ValueTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ValueTemplate(..)")
    }
}

impl BlockKind {
    pub fn builder(id: &str) -> BlockKindBuilder {
        BlockKindBuilder::new(id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn has_flow_in(&self) -> bool {
        self.flow_in
    }

    pub fn has_flow_out(&self) -> bool {
        self.flow_out
    }

    pub fn shape(&self) -> &BlockShape {
        &self.shape
    }

    pub fn data_inputs(&self) -> &[DataInput] {
        &self.data_inputs
    }

    pub fn data_outputs(&self) -> &[String] {
        &self.data_outputs
    }

    /// Declared fields with their default values, in declaration order.
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn code(&self) -> Option<&CodeTemplate> {
        self.code.as_ref()
    }

    /// Whether blocks of this kind can produce a value for a data input.
    pub fn is_producer(&self) -> bool {
        self.value.is_some()
    }

    /// Renders the block's value expression, if the kind has a value template.
    pub fn render_value(&self, ctx: &BlockContext<'_>) -> Option<String> {
        self.value.as_ref().map(|v| (v.0)(ctx))
    }

    /// Whether this kind declares the given port.
    pub fn has_port(&self, direction: Direction, channel: Channel, name: &str) -> bool {
        match (channel, direction) {
            (Channel::Flow, Direction::In) => self.flow_in && name == FLOW_IN,
            (Channel::Flow, Direction::Out) => {
                (self.flow_out && name == FLOW_NEXT) || self.shape.slots().contains(&name)
            }
            (Channel::Data, Direction::In) => self.data_inputs.iter().any(|i| i.name == name),
            (Channel::Data, Direction::Out) => self.data_outputs.iter().any(|o| o == name),
        }
    }
}

/// Builds a `BlockKind`, computing its `BlockShape` once from the declared flags.
pub struct BlockKindBuilder {
    id: String,
    label: Option<String>,
    category: String,
    flow_in: bool,
    flow_out: bool,
    branches: Vec<String>,
    container: Option<String>,
    partition: Option<Discriminator>,
    data_inputs: Vec<DataInput>,
    data_outputs: Vec<String>,
    fields: Vec<(String, Value)>,
    code: Option<CodeTemplate>,
    value: Option<ValueFn>,
}

impl BlockKindBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            label: None,
            category: "general".to_string(),
            flow_in: false,
            flow_out: false,
            branches: Vec::new(),
            container: None,
            partition: None,
            data_inputs: Vec::new(),
            data_outputs: Vec::new(),
            fields: Vec::new(),
            code: None,
            value: None,
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn flow_in(mut self) -> Self {
        self.flow_in = true;
        self
    }

    pub fn flow_out(mut self) -> Self {
        self.flow_out = true;
        self
    }

    /// Shorthand for a statement block with both flow-in and flow-out.
    pub fn sequential(self) -> Self {
        self.flow_in().flow_out()
    }

    /// Adds a branch slot. Slots are passed to the template in the order added.
    pub fn branch(mut self, slot: &str) -> Self {
        self.branches.push(slot.to_string());
        self
    }

    /// Makes the kind a container with a single children slot.
    pub fn container(mut self, slot: &str) -> Self {
        self.container = Some(slot.to_string());
        self
    }

    /// Children of these kinds are emitted before all other children.
    pub fn partition(mut self, members: &[&str]) -> Self {
        self.partition = Some(Discriminator {
            members: members.iter().map(|m| m.to_string()).collect(),
        });
        self
    }

    pub fn data_input(mut self, input: DataInput) -> Self {
        self.data_inputs.push(input);
        self
    }

    pub fn data_output(mut self, name: &str) -> Self {
        self.data_outputs.push(name.to_string());
        self
    }

    pub fn field(mut self, name: &str, default: impl Into<Value>) -> Self {
        self.fields.push((name.to_string(), default.into()));
        self
    }

    pub fn statement<F>(mut self, f: F) -> Self
    where
        F: Fn(&BlockContext<'_>) -> String + Send + Sync + 'static,
    {
        self.code = Some(CodeTemplate::Statement(Arc::new(f) as StatementFn));
        self
    }

    pub fn nested<F>(mut self, f: F) -> Self
    where
        F: Fn(&BlockContext<'_>, &[String]) -> String + Send + Sync + 'static,
    {
        self.code = Some(CodeTemplate::Nested(Arc::new(f) as NestedFn));
        self
    }

    pub fn value<F>(mut self, f: F) -> Self
    where
        F: Fn(&BlockContext<'_>) -> String + Send + Sync + 'static,
    {
        self.value = Some(Arc::new(f));
        self
    }

    pub fn build(self) -> BlockKind {
        let shape = match (self.container, self.branches.is_empty()) {
            (Some(slot), _) => BlockShape::Container {
                slot,
                partition: self.partition,
            },
            (None, false) => BlockShape::Branching {
                slots: self.branches,
            },
            (None, true) => BlockShape::Plain,
        };

        BlockKind {
            label: self.label.unwrap_or_else(|| self.id.clone()),
            id: self.id,
            category: self.category,
            flow_in: self.flow_in,
            flow_out: self.flow_out,
            shape,
            data_inputs: self.data_inputs,
            data_outputs: self.data_outputs,
            fields: self.fields,
            code: self.code,
            value: self.value.map(ValueTemplate),
        }
    }
}
