pub use self::{observation::*, pit::*, player::*};

pub(crate) mod observation;
pub(crate) mod pit;
pub(crate) mod player;
