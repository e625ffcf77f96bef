//=========================================================================
// Render Target
//=========================================================================
//
// Opaque surface handed to draw subscribers once per frame.
//
// The engine never draws by itself. Draw subscribers receive the target
// and use whatever renderer they own against it; the window implements
// this trait in the platform layer.
//
//=========================================================================

/// A surface draw subscribers render into.
pub trait RenderTarget {
    /// Drawable size in physical pixels.
    fn size(&self) -> (u32, u32);

    /// Ratio between physical and logical pixels.
    fn scale_factor(&self) -> f64 {
        1.0
    }

    /// Asks the platform to present another frame soon.
    fn request_redraw(&self) {}
}
