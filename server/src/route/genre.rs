use application::service::{
    CreateGenreService, DeleteGenreService, GetGenreService, UpdateGenreService,
};
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::WithRejection;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::{AppModule, Store};
use crate::request::{
    CreateGenreRequest, DeleteGenreRequest, GenreTransformer, GetGenreRequest,
    UpdateGenreRequest,
};
use crate::response::GenrePresenter;

pub trait GenreRouter {
    fn route_genre(self) -> Self;
}

impl<D: Store> GenreRouter for Router<AppModule<D>> {
    fn route_genre(self) -> Self {
        self.route(
            "/genres",
            get(|State(module): State<AppModule<D>>| async move {
                Controller::new((), GenrePresenter)
                    .bypass(|| async move { module.database().get_genres().await })
                    .await
                    .map_err(ErrorStatus::from)
            })
            .post(
                |State(module): State<AppModule<D>>,
                 WithRejection(Json(req), _): WithRejection<Json<CreateGenreRequest>, ErrorStatus>| async move {
                    Controller::new(GenreTransformer, GenrePresenter)
                        .try_intake(req)
                        .map_err(ErrorStatus::from)?
                        .handle(|dto| async move { module.database().create_genre(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/genres/:id",
            get(
                |State(module): State<AppModule<D>>, Path(id): Path<String>| async move {
                    Controller::new(GenreTransformer, GenrePresenter)
                        .try_intake(GetGenreRequest::new(id))
                        .map_err(ErrorStatus::from)?
                        .handle(|dto| async move { module.database().get_genre(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .put(
                |State(module): State<AppModule<D>>,
                 Path(id): Path<String>,
                 WithRejection(Json(req), _): WithRejection<Json<UpdateGenreRequest>, ErrorStatus>| async move {
                    Controller::new(GenreTransformer, GenrePresenter)
                        .try_intake((id, req))
                        .map_err(ErrorStatus::from)?
                        .handle(|dto| async move { module.database().update_genre(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule<D>>, Path(id): Path<String>| async move {
                    Controller::new(GenreTransformer, GenrePresenter)
                        .try_intake(DeleteGenreRequest::new(id))
                        .map_err(ErrorStatus::from)?
                        .handle(|dto| async move { module.database().delete_genre(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
