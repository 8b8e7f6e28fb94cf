/// Sink for generated text. The parser writes the implementation unit through
/// `emit` and the interface unit through `emit_interface`; while a capture is
/// open, `emit` lands in the capture buffer instead.
pub trait Emitter {
    fn emit(&mut self, text: &str);

    fn emit_interface(&mut self, text: &str);

    /// Start redirecting `emit` into a fresh buffer.
    fn begin_capture(&mut self);

    /// Stop the innermost capture and hand back what it collected.
    fn end_capture(&mut self) -> String;

    fn is_capturing(&self) -> bool;
}

/// The two artifacts produced for one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleOutput {
    pub implementation: String,
    pub interface: String,
}

/// In-memory emitter. Files are only written once a module compiled cleanly.
#[derive(Debug, Default)]
pub struct TextEmitter {
    output: ModuleOutput,
    captures: Vec<String>,
}

impl TextEmitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn finish(self) -> ModuleOutput {
        debug_assert!(!self.is_capturing(), "capture left open");
        self.output
    }
}

impl Emitter for TextEmitter {
    fn emit(&mut self, text: &str) {
        match self.captures.last_mut() {
            Some(buffer) => buffer.push_str(text),
            None => self.output.implementation.push_str(text),
        }
    }

    fn emit_interface(&mut self, text: &str) {
        self.output.interface.push_str(text);
    }

    fn begin_capture(&mut self) {
        self.captures.push(String::new());
    }

    fn end_capture(&mut self) -> String {
        self.captures.pop().unwrap_or_default()
    }

    fn is_capturing(&self) -> bool {
        !self.captures.is_empty()
    }
}
