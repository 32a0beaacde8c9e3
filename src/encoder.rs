//! The traversal/encoding engine.

use log::{debug, trace};

use crate::buffer::AliasBuffer;
use crate::error::XsonError;
use crate::format::{Format, XsonFormat};
use crate::mapper::Mapper;
use crate::provider::{Provider, StdProvider};
use crate::reference::{self, Key};
use crate::tracker::{Strategy, Tracker};
use crate::value::{Node, ObjectId, Value};

/// The Xson encoder.
///
/// Holds only configuration: every [`Encoder::encode`] /
/// [`Encoder::x_encode`] call spins up a fresh tracker (and, in extended
/// mode, a fresh alias buffer), so one encoder can serve any number of
/// independent calls and nothing leaks between them.
pub struct Encoder {
    format: Box<dyn Format>,
    mapper: Option<Box<dyn Mapper>>,
    provider: Box<dyn Provider>,
    strategy: Strategy,
}

impl Encoder {
    /// Dense format, no alias mapper, standard provider, exhaustive
    /// tracking.
    pub fn new() -> Self {
        Encoder {
            format: Box::new(XsonFormat::Dense),
            mapper: None,
            provider: Box::new(StdProvider),
            strategy: Strategy::Exhaustive,
        }
    }

    pub fn with_format(mut self, format: impl Format + 'static) -> Self {
        self.format = Box::new(format);
        self
    }

    pub fn with_mapper(mut self, mapper: impl Mapper + 'static) -> Self {
        self.mapper = Some(Box::new(mapper));
        self
    }

    pub fn with_provider(mut self, provider: impl Provider + 'static) -> Self {
        self.provider = Box::new(provider);
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Plain mode: recursive descent where revisited objects render as
    /// document-relative reference expressions.
    pub fn encode(&self, value: &Value) -> Result<String, XsonError> {
        trace!("encode: plain mode, {:?}", self.strategy);
        let mut run = Run::new(self, false);
        run.encode_value(value)
    }

    /// Extended mode: the root is wrapped under the `"$"` key and mapped
    /// objects are collected into deduplicated trailing buckets.
    pub fn x_encode(&self, value: &Value) -> Result<String, XsonError> {
        trace!("encode: extended mode, {:?}", self.strategy);
        let mut run = Run::new(self, true);
        let mut out = String::from("{");
        run.tracker.descend(Key::name("$"))?;
        out.push_str(&run.newline());
        out.push_str(&reference::quote("$"));
        out.push_str(self.format.colon());
        out.push_str(&run.encode_value(value)?);
        run.tracker.ascend();
        out.push_str(&run.flush_buffer()?);
        out.push_str(&run.newline());
        out.push('}');
        Ok(out)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// State private to one encode call.
struct Run<'e> {
    encoder: &'e Encoder,
    tracker: Box<dyn Tracker>,
    buffer: Option<AliasBuffer>,
    /// Nesting count of in-flight bucket sub-encodes; shifts the alias
    /// depth gate one level deeper.
    buffering: usize,
}

impl<'e> Run<'e> {
    fn new(encoder: &'e Encoder, extended: bool) -> Self {
        Run {
            encoder,
            tracker: encoder.strategy.new_tracker(),
            buffer: extended.then(AliasBuffer::new),
            buffering: 0,
        }
    }

    fn encode_value(&mut self, value: &Value) -> Result<String, XsonError> {
        if let Value::Object(object) = value {
            let id = ObjectId::of(object);
            if let Some(path) = self.tracker.resolve(id) {
                return Ok(reference::reference(&path));
            }
            if let Some(bucket) = self.alias_of(value) {
                let (inserted, index) = self.buffer_mut().insert(&bucket, id);
                if inserted {
                    self.encode_alias(value, &bucket, index)?;
                }
                return Ok(reference::reference(&[Key::Name(bucket), Key::Index(index)]));
            }
            self.tracker.register(id);
        }
        let node = self.encoder.provider.extract(value, self.tracker.as_ref())?;
        match node {
            Node::Scalar(payload) => payload.literal().ok_or(XsonError::Classification {
                found: payload.kind(),
            }),
            Node::Sequence(items) => self.encode_sequence(&items),
            Node::Mapping(entries) => self.encode_mapping(&entries),
        }
    }

    /// Bucket name for `value`, if extended mode is on, a mapper is
    /// configured and the depth gate passes. Aliasing never applies to
    /// the root or its immediate child; the gate sits one level deeper
    /// while a bucket entry is being encoded, so an entry cannot alias
    /// itself into a cycle.
    fn alias_of(&self, value: &Value) -> Option<String> {
        let mapper = self.encoder.mapper.as_ref()?;
        self.buffer.as_ref()?;
        let Value::Object(object) = value else {
            return None;
        };
        let gate = if self.buffering > 0 { 3 } else { 2 };
        if self.tracker.depth() < gate {
            return None;
        }
        mapper.alias_of(object.as_ref(), self.tracker.as_ref())
    }

    /// Encodes a freshly inserted bucket entry as a sub-traversal rooted
    /// at `[bucket, index]`, then stores the text in its slot. The path
    /// is rerouted for the duration; the same buffer keeps collecting so
    /// nested aliases compose.
    fn encode_alias(&mut self, value: &Value, bucket: &str, index: usize) -> Result<(), XsonError> {
        debug!("bucket entry {bucket}[{index}]");
        self.buffering += 1;
        let snapshot = self.tracker.capture();
        self.tracker.rewind();
        let result = self.encode_entry(value, bucket, index);
        self.tracker.restore(snapshot);
        self.buffering -= 1;
        let text = result?;
        self.buffer_mut().write_at(bucket, index, text);
        Ok(())
    }

    // Runs on a rewound tracker; encode_alias restores it afterwards.
    fn encode_entry(&mut self, value: &Value, bucket: &str, index: usize) -> Result<String, XsonError> {
        self.tracker.descend(Key::name(bucket))?;
        self.tracker.descend(Key::Index(index))?;
        self.encode_value(value)
    }

    fn encode_sequence(&mut self, items: &[Value]) -> Result<String, XsonError> {
        if items.is_empty() {
            return Ok("[]".to_string());
        }
        let mut out = String::from("[");
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                out.push(',');
            }
            self.tracker.descend(Key::Index(index))?;
            out.push_str(&self.newline());
            out.push_str(&self.encode_value(item)?);
            self.tracker.ascend();
        }
        out.push_str(&self.newline());
        out.push(']');
        Ok(out)
    }

    fn encode_mapping(&mut self, entries: &[(String, Value)]) -> Result<String, XsonError> {
        if entries.is_empty() {
            return Ok("{}".to_string());
        }
        let mut out = String::from("{");
        for (index, (key, item)) in entries.iter().enumerate() {
            if index > 0 {
                out.push(',');
            }
            self.tracker.descend(Key::name(key.clone()))?;
            out.push_str(&self.newline());
            out.push_str(&reference::quote(key));
            out.push_str(self.encoder.format.colon());
            out.push_str(&self.encode_value(item)?);
            self.tracker.ascend();
        }
        out.push_str(&self.newline());
        out.push('}');
        Ok(out)
    }

    /// Appends each bucket as a top-level array property, in discovery
    /// order. Runs once, after the root value has finished encoding.
    fn flush_buffer(&mut self) -> Result<String, XsonError> {
        let Some(buffer) = self.buffer.take() else {
            return Ok(String::new());
        };
        let mut out = String::new();
        for (name, texts) in buffer.drain() {
            self.tracker.descend(Key::name(name.as_str()))?;
            out.push(',');
            out.push_str(&self.newline());
            out.push_str(&reference::quote(&name));
            out.push_str(self.encoder.format.colon());
            out.push('[');
            for (index, text) in texts.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                self.tracker.descend(Key::Index(index))?;
                out.push_str(&self.newline());
                out.push_str(text);
                self.tracker.ascend();
            }
            out.push_str(&self.newline());
            out.push(']');
            self.tracker.ascend();
        }
        Ok(out)
    }

    fn newline(&self) -> String {
        let format = &self.encoder.format;
        let mut out = String::from(format.linebreak());
        out.push_str(&format.indent(self.tracker.depth()));
        out
    }

    fn buffer_mut(&mut self) -> &mut AliasBuffer {
        self.buffer
            .as_mut()
            .expect("alias buffer present in extended mode")
    }
}
