use std::ops::Deref;
use std::sync::Arc;

use kernel::interface::query::{
    DependOnCustomerQuery, DependOnGenreQuery, DependOnMovieQuery, DependOnRentalQuery,
};
use kernel::interface::update::{
    DependOnCustomerModifier, DependOnGenreModifier, DependOnMovieModifier,
    DependOnRentalModifier,
};

/// Everything the routes need from a store backend.
pub trait Store:
    'static
    + Clone
    + DependOnGenreQuery
    + DependOnGenreModifier
    + DependOnMovieQuery
    + DependOnMovieModifier
    + DependOnCustomerQuery
    + DependOnCustomerModifier
    + DependOnRentalQuery
    + DependOnRentalModifier
{
}

impl<T> Store for T where
    T: Clone
        + DependOnGenreQuery
        + DependOnGenreModifier
        + DependOnMovieQuery
        + DependOnMovieModifier
        + DependOnCustomerQuery
        + DependOnCustomerModifier
        + DependOnRentalQuery
        + DependOnRentalModifier
{
}

pub struct AppModule<D>(Arc<Handler<D>>);

impl<D> Clone for AppModule<D> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<D: Store> AppModule<D> {
    pub fn new(database: D) -> Self {
        Self(Arc::new(Handler { database }))
    }
}

impl<D> Deref for AppModule<D> {
    type Target = Handler<D>;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

pub struct Handler<D> {
    database: D,
}

impl<D> Handler<D> {
    pub fn database(&self) -> &D {
        &self.database
    }
}
