mod customer;
mod genre;
mod movie;
mod rental;

pub use self::{customer::*, genre::*, movie::*, rental::*};
