use crate::lpp_heap::{GcError, GcResult};

/// Collector tuning knobs, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GcOption {
    /// Pairs per page. Larger pages mean fewer allocations but a coarser
    /// memory ceiling.
    pub page_size: usize,
    /// Incremental marking steps run per allocation, root, unroot or barrier.
    pub garbage_steps: usize,
    /// Disposed pairs returned to the allocator per triggering event.
    pub recycle_steps: usize,
    /// Upper bound on pages; `None` grows until the system allocator refuses.
    pub max_pages: Option<usize>,
}

impl Default for GcOption {
    fn default() -> Self {
        Self {
            page_size: 256,
            garbage_steps: 4,
            recycle_steps: 2,
            max_pages: None,
        }
    }
}

impl GcOption {
    /// Options that never run collector work implicitly; only explicit
    /// `step_*`/`cycle_*` calls move pairs between classes.
    pub fn manual(page_size: usize) -> Self {
        Self {
            page_size,
            garbage_steps: 0,
            recycle_steps: 0,
            max_pages: None,
        }
    }

    pub fn validate(&self) -> GcResult<()> {
        if self.page_size == 0 {
            return Err(GcError::InvalidOption("page_size must be at least 1"));
        }
        if self.page_size > u32::MAX as usize {
            return Err(GcError::InvalidOption("page_size must fit in 32 bits"));
        }
        if self.max_pages == Some(0) {
            return Err(GcError::InvalidOption("max_pages must be at least 1"));
        }
        Ok(())
    }

    /// Parse options from JSON; missing fields keep their defaults.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> GcResult<Self> {
        let option: GcOption =
            serde_json::from_str(json).map_err(|e| GcError::Config(e.to_string()))?;
        option.validate()?;
        Ok(option)
    }
}
