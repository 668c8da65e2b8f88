//! Modal visibility kept in the URL query instead of in memory.
//!
//! A modal is open exactly when its parameter is present in the current
//! location, so reloads, deep links and back/forward all reconstruct it.

use super::history::History;
use super::location::Location;
use parking_lot::Mutex;
use std::sync::Arc;

pub const DEFAULT_MODAL_PARAM: &str = "modal";
pub const DEFAULT_OPEN_TOKEN: &str = "open";

/// How opening a modal touches the history stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalMode {
    /// Opening adds an entry; the back button closes the modal.
    #[default]
    Push,
    /// Opening rewrites the current entry.
    Replace,
}

pub struct ModalStateController {
    history: Arc<dyn History>,
    param: String,
    mode: ModalMode,
    /// Entry this controller pushed when opening, if it is still ours to pop.
    pushed: Mutex<Option<String>>,
}

impl ModalStateController {
    pub fn new(history: Arc<dyn History>, param: impl Into<String>, mode: ModalMode) -> Self {
        Self {
            history,
            param: param.into(),
            mode,
            pushed: Mutex::new(None),
        }
    }

    pub fn with_default_param(history: Arc<dyn History>, mode: ModalMode) -> Self {
        Self::new(history, DEFAULT_MODAL_PARAM, mode)
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    pub fn mode(&self) -> ModalMode {
        self.mode
    }

    fn current(&self) -> Location {
        Location::parse(&self.history.location())
    }

    pub fn value(&self) -> Option<String> {
        self.current().query_value(&self.param).map(str::to_string)
    }

    pub fn is_open(&self) -> bool {
        self.value().is_some()
    }

    /// Whether the modal is showing exactly `token`, e.g. `edit:42`.
    pub fn query(&self, token: &str) -> bool {
        self.value().as_deref() == Some(token)
    }

    pub fn open_default(&self) {
        self.open(DEFAULT_OPEN_TOKEN)
    }

    /// Opening an already open modal swaps its token on the current entry
    /// so one back press still leaves it.
    pub fn open(&self, token: &str) {
        let current = self.current();
        let already_open = current.query_value(&self.param).is_some();
        if current.query_value(&self.param) == Some(token) {
            return;
        }

        let target = current.with_param(&self.param, token).to_string();
        let mut pushed = self.pushed.lock();

        if self.mode == ModalMode::Push && !already_open {
            self.history.push(&target);
            *pushed = Some(target);
        } else {
            let ours = pushed.as_deref() == Some(self.history.location().as_str());
            self.history.replace(&target);
            if ours {
                *pushed = Some(target);
            }
        }
        tracing::debug!(param = %self.param, token, mode = ?self.mode, "modal opened");
    }

    /// Pops the entry this controller pushed, or strips the parameter from
    /// the current entry when the open came from elsewhere (deep link, replace
    /// mode, user navigation).
    pub fn close(&self) {
        let mut pushed = self.pushed.lock();
        let location = self.history.location();
        let current = Location::parse(&location);

        if current.query_value(&self.param).is_none() {
            *pushed = None;
            return;
        }

        let ours = pushed.take().as_deref() == Some(location.as_str());
        if self.mode == ModalMode::Push && ours {
            self.history.back();
        } else {
            self.history
                .replace(&current.without_param(&self.param).to_string());
        }
        tracing::debug!(param = %self.param, popped = ours, "modal closed");
    }

    /// Whether the current entry is the one this controller pushed.
    fn owns_current_entry(&self) -> bool {
        self.pushed.lock().as_deref() == Some(self.history.location().as_str())
    }
}

/// Independent modals on one screen, each under its own parameter.
pub struct ModalGroup {
    controllers: Vec<ModalStateController>,
}

impl ModalGroup {
    pub fn new<I, S>(history: Arc<dyn History>, params: I, mode: ModalMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut controllers: Vec<ModalStateController> = Vec::new();
        for param in params {
            let param = param.into();
            if controllers.iter().any(|c| c.param == param) {
                tracing::warn!(param = %param, "Duplicate modal parameter ignored");
                continue;
            }
            controllers.push(ModalStateController::new(history.clone(), param, mode));
        }
        Self { controllers }
    }

    pub fn get(&self, param: &str) -> Option<&ModalStateController> {
        self.controllers.iter().find(|c| c.param == param)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModalStateController> {
        self.controllers.iter()
    }

    /// `(param, token)` for every open modal.
    pub fn open_modals(&self) -> Vec<(String, String)> {
        self.controllers
            .iter()
            .filter_map(|c| c.value().map(|value| (c.param.clone(), value)))
            .collect()
    }

    /// Closes the most recently pushed modal first so every pushed entry is
    /// popped rather than left behind the current one. Modals that were not
    /// pushed by us are stripped from the final entry afterwards.
    pub fn close_all(&self) {
        while let Some(top) = self
            .controllers
            .iter()
            .find(|c| c.is_open() && c.owns_current_entry())
        {
            top.close();
        }
        for controller in &self.controllers {
            if controller.is_open() {
                controller.close();
            }
        }
    }
}
