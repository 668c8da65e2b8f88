use parking_lot::Mutex;

/// The browser history stack as seen by the session and modal layers.
pub trait History: Send + Sync {
    /// Current navigable location (path, query and fragment).
    fn location(&self) -> String;
    fn push(&self, url: &str);
    fn replace(&self, url: &str);
    fn back(&self);
    fn forward(&self);
}

#[derive(Debug)]
struct Stack {
    entries: Vec<String>,
    cursor: usize,
}

/// In-process history with browser semantics: pushing drops forward entries,
/// `back`/`forward` past either end are ignored.
#[derive(Debug)]
pub struct MemoryHistory {
    stack: Mutex<Stack>,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            stack: Mutex::new(Stack {
                entries: vec![initial.into()],
                cursor: 0,
            }),
        }
    }

    /// Number of entries, including any ahead of the cursor.
    pub fn len(&self) -> usize {
        self.stack.lock().entries.len()
    }

    pub fn position(&self) -> usize {
        self.stack.lock().cursor
    }

    pub fn entries(&self) -> Vec<String> {
        self.stack.lock().entries.clone()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl History for MemoryHistory {
    fn location(&self) -> String {
        let stack = self.stack.lock();
        stack.entries[stack.cursor].clone()
    }

    fn push(&self, url: &str) {
        let mut stack = self.stack.lock();
        let next = stack.cursor + 1;
        stack.entries.truncate(next);
        stack.entries.push(url.to_string());
        stack.cursor = next;
        tracing::debug!(url, depth = stack.entries.len(), "history push");
    }

    fn replace(&self, url: &str) {
        let mut stack = self.stack.lock();
        let cursor = stack.cursor;
        stack.entries[cursor] = url.to_string();
        tracing::debug!(url, "history replace");
    }

    fn back(&self) {
        let mut stack = self.stack.lock();
        if stack.cursor > 0 {
            stack.cursor -= 1;
        }
    }

    fn forward(&self) {
        let mut stack = self.stack.lock();
        if stack.cursor + 1 < stack.entries.len() {
            stack.cursor += 1;
        }
    }
}
