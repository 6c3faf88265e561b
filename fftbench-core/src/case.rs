//! Transform Cases
//!
//! A [`Transform`] is one implementation under test. The engine wraps each in
//! a [`TransformCase`] that carries the enabled flag and the buffer length
//! of the last initialization, and keeps them in a [`CaseRegistry`] whose
//! order is the order cases are swept in.

use regex::Regex;
use thiserror::Error;

/// Failure reported by a transform implementation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaseError {
    /// The implementation cannot handle this length
    #[error("size {size} not supported: {reason}")]
    SizeUnsupported {
        /// Requested length
        size: usize,
        /// Why it was rejected
        reason: String,
    },

    /// Anything else that went wrong inside the implementation
    #[error("{0}")]
    Fault(String),
}

impl CaseError {
    /// Shorthand for [`CaseError::SizeUnsupported`]
    pub fn unsupported(size: usize, reason: impl Into<String>) -> Self {
        CaseError::SizeUnsupported {
            size,
            reason: reason.into(),
        }
    }
}

/// One transform implementation under test
pub trait Transform: Send {
    /// Display name, used as the aggregation key. Must not change.
    fn name(&self) -> &str;

    /// Prepare state for `data.len()` samples and take a copy of the input.
    fn initialize(&mut self, data: &[f64]) -> Result<(), CaseError>;

    /// Run one transform over the working buffer. Called repeatedly after a
    /// single [`Transform::initialize`].
    fn transform(&mut self, forward: bool) -> Result<(), CaseError>;
}

/// A registered transform with its enabled flag
pub struct TransformCase {
    transform: Box<dyn Transform>,
    enabled: bool,
    size: usize,
}

impl TransformCase {
    /// Wrap a transform; new cases start enabled
    pub fn new(transform: impl Transform + 'static) -> Self {
        Self::from_boxed(Box::new(transform))
    }

    /// Wrap an already boxed transform
    pub fn from_boxed(transform: Box<dyn Transform>) -> Self {
        Self {
            transform,
            enabled: true,
            size: 0,
        }
    }

    /// Display name of the wrapped transform
    pub fn name(&self) -> &str {
        self.transform.name()
    }

    /// Whether the sweep should run this case
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the case
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Buffer length of the last successful initialization (0 before any)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Initialize the transform for `data`
    pub fn initialize(&mut self, data: &[f64]) -> Result<(), CaseError> {
        self.transform.initialize(data)?;
        self.size = data.len();
        Ok(())
    }

    /// Run one transform
    #[inline]
    pub fn transform(&mut self, forward: bool) -> Result<(), CaseError> {
        self.transform.transform(forward)
    }
}

impl std::fmt::Debug for TransformCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformCase")
            .field("name", &self.name())
            .field("enabled", &self.enabled)
            .field("size", &self.size)
            .finish()
    }
}

/// Registry errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A case with this name is already registered
    #[error("Case already registered: {0}")]
    DuplicateName(String),

    /// No case with this name
    #[error("Unknown case: {0}")]
    UnknownCase(String),
}

/// Ordered collection of cases with unique names
#[derive(Debug, Default)]
pub struct CaseRegistry {
    cases: Vec<TransformCase>,
}

impl CaseRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a case; names must be unique
    pub fn register(&mut self, case: TransformCase) -> Result<(), RegistryError> {
        if self.get(case.name()).is_some() {
            return Err(RegistryError::DuplicateName(case.name().to_string()));
        }
        self.cases.push(case);
        Ok(())
    }

    /// Register a transform, wrapping it in an enabled case
    pub fn register_transform(
        &mut self,
        transform: impl Transform + 'static,
    ) -> Result<(), RegistryError> {
        self.register(TransformCase::new(transform))
    }

    /// Look up a case by name
    pub fn get(&self, name: &str) -> Option<&TransformCase> {
        self.cases.iter().find(|c| c.name() == name)
    }

    /// Enable or disable the case called `name`
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<(), RegistryError> {
        let case = self
            .cases
            .iter_mut()
            .find(|c| c.name() == name)
            .ok_or_else(|| RegistryError::UnknownCase(name.to_string()))?;
        case.set_enabled(enabled);
        Ok(())
    }

    /// Disable every case whose name does not match `filter`.
    ///
    /// Already disabled cases stay disabled.
    pub fn retain_matching(&mut self, filter: &Regex) {
        for case in &mut self.cases {
            if !filter.is_match(case.name()) {
                case.set_enabled(false);
            }
        }
    }

    /// Number of enabled cases
    pub fn enabled_count(&self) -> usize {
        self.cases.iter().filter(|c| c.is_enabled()).count()
    }

    /// Names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.cases.iter().map(|c| c.name())
    }

    /// Iterate cases in registration order
    pub fn iter(&self) -> impl Iterator<Item = &TransformCase> {
        self.cases.iter()
    }

    /// Mutable view for a sweep
    pub fn as_mut_slice(&mut self) -> &mut [TransformCase] {
        &mut self.cases
    }

    /// Number of registered cases
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Hand the cases over, e.g. to a sweep worker
    pub fn into_cases(self) -> Vec<TransformCase> {
        self.cases
    }
}
