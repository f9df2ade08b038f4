use crate::error::Result;
use crate::state::FrameBuffer;

/// # Machine
/// Everything a host loop needs from an interpreter, and nothing else.
///
/// Hosts drive a machine by calling `step` at their own clock rate and
/// `tick_timers` at 60Hz, forwarding key state in between and redrawing
/// whenever `should_draw` reports a change.
pub trait Machine {
    /// Puts the machine back to its power-on state.
    fn reset(&mut self);

    /// Resets the machine and copies `program` to the program start address.
    fn load(&mut self, program: &[u8]) -> Result<()>;

    /// Fetches, decodes and executes a single instruction.
    fn step(&mut self) -> Result<()>;

    /// Whether the frame buffer changed since the last `clear_draw_flag`.
    fn should_draw(&self) -> bool;

    fn clear_draw_flag(&mut self);

    fn frame_buffer(&self) -> &FrameBuffer;

    /// The pressed status of keys 0..F, for the host to overwrite.
    fn keys_mut(&mut self) -> &mut [bool; 16];

    /// Sets the pressed status of a single key. Keys past 0xF are ignored.
    fn set_key(&mut self, key: u8, pressed: bool) {
        if let Some(slot) = self.keys_mut().get_mut(key as usize) {
            *slot = pressed;
        }
    }

    /// Decrements both timers toward zero.
    fn tick_timers(&mut self);

    fn delay_timer(&self) -> u8;

    fn sound_timer(&self) -> u8;
}
