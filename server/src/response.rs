pub use self::{customer::*, genre::*, movie::*, rental::*};

mod customer;
mod genre;
mod movie;
mod rental;
