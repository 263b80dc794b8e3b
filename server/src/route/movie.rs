use application::service::{
    CreateMovieService, DeleteMovieService, GetMovieService, UpdateMovieService,
};
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::WithRejection;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::{AppModule, Store};
use crate::request::{
    CreateMovieRequest, DeleteMovieRequest, GetMovieRequest, MovieTransformer,
    UpdateMovieRequest,
};
use crate::response::MoviePresenter;

pub trait MovieRouter {
    fn route_movie(self) -> Self;
}

impl<D: Store> MovieRouter for Router<AppModule<D>> {
    fn route_movie(self) -> Self {
        self.route(
            "/movies",
            get(|State(module): State<AppModule<D>>| async move {
                Controller::new((), MoviePresenter)
                    .bypass(|| async move { module.database().get_movies().await })
                    .await
                    .map_err(ErrorStatus::from)
            })
            .post(
                |State(module): State<AppModule<D>>,
                 WithRejection(Json(req), _): WithRejection<Json<CreateMovieRequest>, ErrorStatus>| async move {
                    Controller::new(MovieTransformer, MoviePresenter)
                        .try_intake(req)
                        .map_err(ErrorStatus::from)?
                        .handle(|dto| async move { module.database().create_movie(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/movies/:id",
            get(
                |State(module): State<AppModule<D>>, Path(id): Path<String>| async move {
                    Controller::new(MovieTransformer, MoviePresenter)
                        .try_intake(GetMovieRequest::new(id))
                        .map_err(ErrorStatus::from)?
                        .handle(|dto| async move { module.database().get_movie(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .put(
                |State(module): State<AppModule<D>>,
                 Path(id): Path<String>,
                 WithRejection(Json(req), _): WithRejection<Json<UpdateMovieRequest>, ErrorStatus>| async move {
                    Controller::new(MovieTransformer, MoviePresenter)
                        .try_intake((id, req))
                        .map_err(ErrorStatus::from)?
                        .handle(|dto| async move { module.database().update_movie(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule<D>>, Path(id): Path<String>| async move {
                    Controller::new(MovieTransformer, MoviePresenter)
                        .try_intake(DeleteMovieRequest::new(id))
                        .map_err(ErrorStatus::from)?
                        .handle(|dto| async move { module.database().delete_movie(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
