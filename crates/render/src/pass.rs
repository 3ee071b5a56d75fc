use cadence_common::FrameError;

/// Content categories a pass excludes, plus the post-processing marker.
///
/// Flags are descriptors fixed at construction; the pipeline reads them on
/// every walk but never mutates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassFlags {
    pub skip_world_below: bool,
    pub skip_world_above: bool,
    pub skip_entities: bool,
    pub skip_engine_hooks: bool,
    pub post_process: bool,
}

impl PassFlags {
    /// Flags for an overlay pass: engine hooks only.
    pub fn overlay() -> Self {
        Self {
            skip_world_below: true,
            skip_world_above: true,
            skip_entities: true,
            skip_engine_hooks: false,
            post_process: false,
        }
    }

    /// Flags for a world pass: geometry and entities, no hooks.
    pub fn world() -> Self {
        Self {
            skip_engine_hooks: true,
            ..Self::default()
        }
    }
}

/// Named render output a pass leaves behind for a downstream
/// post-processing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTarget {
    pub label: String,
}

impl RenderTarget {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

/// One stage of the frame.
///
/// `begin` sees the previous pass (None for the head) and, when this pass is
/// a post-processing pass, the previous pass's render target. `end` sees the
/// next pass (None for the tail). Between the two, the pipeline feeds the
/// scene content this pass's flags do not exclude.
pub trait RenderPass: Send {
    /// Stable identifier used in logs and errors.
    fn technique(&self) -> &str;

    fn flags(&self) -> PassFlags;

    fn begin(
        &mut self,
        previous: Option<&dyn RenderPass>,
        source: Option<&RenderTarget>,
    ) -> Result<(), FrameError>;

    fn end(&mut self, next: Option<&dyn RenderPass>) -> Result<(), FrameError>;

    /// Render output this pass exposes to a following post-processing pass.
    fn target(&self) -> Option<&RenderTarget> {
        None
    }
}

/// Pass with fixed flags and no begin/end work of its own.
pub struct BasicPass {
    technique: String,
    flags: PassFlags,
    target: Option<RenderTarget>,
}

impl BasicPass {
    pub fn new(technique: impl Into<String>, flags: PassFlags) -> Self {
        Self {
            technique: technique.into(),
            flags,
            target: None,
        }
    }

    pub fn with_target(mut self, target: RenderTarget) -> Self {
        self.target = Some(target);
        self
    }
}

impl RenderPass for BasicPass {
    fn technique(&self) -> &str {
        &self.technique
    }

    fn flags(&self) -> PassFlags {
        self.flags
    }

    fn begin(
        &mut self,
        _previous: Option<&dyn RenderPass>,
        _source: Option<&RenderTarget>,
    ) -> Result<(), FrameError> {
        Ok(())
    }

    fn end(&mut self, _next: Option<&dyn RenderPass>) -> Result<(), FrameError> {
        Ok(())
    }

    fn target(&self) -> Option<&RenderTarget> {
        self.target.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_exclude_nothing() {
        let flags = PassFlags::default();
        assert!(!flags.skip_world_below);
        assert!(!flags.skip_world_above);
        assert!(!flags.skip_entities);
        assert!(!flags.skip_engine_hooks);
        assert!(!flags.post_process);
    }

    #[test]
    fn overlay_flags_keep_hooks_only() {
        let flags = PassFlags::overlay();
        assert!(flags.skip_world_below);
        assert!(flags.skip_entities);
        assert!(!flags.skip_engine_hooks);
    }

    #[test]
    fn basic_pass_exposes_target() {
        let pass = BasicPass::new("scene", PassFlags::world())
            .with_target(RenderTarget::new("scene-color"));
        assert_eq!(pass.target().map(|t| t.label.as_str()), Some("scene-color"));
    }
}
