pub mod assets;
pub mod calendar;
pub mod download;
pub mod environment;
pub mod interaction;
pub mod player;
pub mod resources;
pub mod session;
pub mod sound_pool;
pub mod sound_select;
pub mod timer;
