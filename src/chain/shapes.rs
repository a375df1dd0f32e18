// -----------------------------------------------
// DOCUMENT SHAPES
// -----------------------------------------------
// Each shape is probed in a fixed priority order; a probe either matches and
// borrows the relevant part of the document, or reports not applicable.

use crate::models::OptionType;
use serde_json::{Map, Value};

/// Top-level keys that may hold the list of expiration blocks, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockList {
    Data,
    OptionChain,
}

pub const BLOCK_LISTS: [BlockList; 2] = [BlockList::Data, BlockList::OptionChain];

impl BlockList {
    pub fn key(self) -> &'static str {
        match self {
            BlockList::Data => "data",
            BlockList::OptionChain => "optionChain",
        }
    }

    pub fn probe(self, root: &Map<String, Value>) -> Option<&Vec<Value>> {
        root.get(self.key()).and_then(Value::as_array)
    }
}

/// Type labels accepted as keys of a grouped payload
pub const TYPE_LABELS: &[(&str, OptionType)] = &[
    ("CALL", OptionType::Call),
    ("PUT", OptionType::Put),
    ("calls", OptionType::Call),
    ("puts", OptionType::Put),
];

/// Where a block keeps its contracts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContractsPayload<'a> {
    /// One collection mixing calls and puts; each entry names its own type
    Mixed(&'a [Value]),
    /// Object keyed by type label, each label holding a collection
    ByLabel(&'a Map<String, Value>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PayloadShape {
    OptionsArray,
    OptionsObject,
    InlineLabels,
}

const PAYLOAD_SHAPES: [PayloadShape; 3] = [
    PayloadShape::OptionsArray,
    PayloadShape::OptionsObject,
    PayloadShape::InlineLabels,
];

impl PayloadShape {
    fn probe(self, block: &Map<String, Value>) -> Option<ContractsPayload<'_>> {
        match self {
            PayloadShape::OptionsArray => block
                .get("options")
                .and_then(Value::as_array)
                .map(|entries| ContractsPayload::Mixed(entries.as_slice())),
            PayloadShape::OptionsObject => block
                .get("options")
                .and_then(Value::as_object)
                .map(ContractsPayload::ByLabel),
            PayloadShape::InlineLabels => TYPE_LABELS
                .iter()
                .any(|(label, _)| block.contains_key(*label))
                .then_some(ContractsPayload::ByLabel(block)),
        }
    }
}

/// First payload shape that matches the block, if any
pub fn locate_payload(block: &Map<String, Value>) -> Option<ContractsPayload<'_>> {
    PAYLOAD_SHAPES.iter().find_map(|shape| shape.probe(block))
}

impl<'a> ContractsPayload<'a> {
    /// Raw contract entries paired with the type implied by their grouping.
    /// Non-object entries and label values that are not collections are skipped.
    pub fn entries(&self) -> Vec<(Option<OptionType>, &'a Map<String, Value>)> {
        match *self {
            ContractsPayload::Mixed(entries) => entries
                .iter()
                .filter_map(Value::as_object)
                .map(|entry| (None, entry))
                .collect(),
            ContractsPayload::ByLabel(groups) => TYPE_LABELS
                .iter()
                .filter_map(|(label, option_type)| {
                    groups
                        .get(*label)
                        .and_then(Value::as_array)
                        .map(|entries| (*option_type, entries))
                })
                .flat_map(|(option_type, entries)| {
                    entries
                        .iter()
                        .filter_map(Value::as_object)
                        .map(move |entry| (Some(option_type), entry))
                })
                .collect(),
        }
    }
}
