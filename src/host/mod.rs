// Host side: window, keyboard and speaker. None of this is needed to run the
// interpreter itself.

pub mod keymap;
pub mod sound;
pub mod window;
