use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
pub trait App {
    /// Called once before the first frame, after the host exists.
    ///
    /// This is where monitors and players register with `ctx.host`.
    fn on_start(&mut self, ctx: &mut FrameCtx<'_>) -> anyhow::Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called once per frame, after the host has run that frame's callbacks.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;

    /// Called once after the last frame.
    fn on_exit(&mut self, ctx: &mut FrameCtx<'_>) {
        let _ = ctx;
    }
}
