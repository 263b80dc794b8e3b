use application::service::{GetRentalService, RentService, ReturnService};
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::{AppModule, Store};
use crate::request::{GetRentalRequest, RentalRequest, RentalTransformer, ReturnRequest};
use crate::response::RentalPresenter;

pub trait RentalRouter {
    fn route_rental(self) -> Self;
}

impl<D: Store> RentalRouter for Router<AppModule<D>> {
    fn route_rental(self) -> Self {
        self.route(
            "/rentals",
            get(|State(module): State<AppModule<D>>| async move {
                Controller::new((), RentalPresenter)
                    .bypass(|| async move { module.database().get_rentals().await })
                    .await
                    .map_err(ErrorStatus::from)
            })
            .post(
                |State(module): State<AppModule<D>>,
                 WithRejection(Json(req), _): WithRejection<Json<RentalRequest>, ErrorStatus>| async move {
                    Controller::new(RentalTransformer, RentalPresenter)
                        .try_intake(req)
                        .map_err(ErrorStatus::from)?
                        .handle(|dto| async move { module.database().rent(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/rentals/:id",
            get(
                |State(module): State<AppModule<D>>, Path(id): Path<String>| async move {
                    Controller::new(RentalTransformer, RentalPresenter)
                        .try_intake(GetRentalRequest::new(id))
                        .map_err(ErrorStatus::from)?
                        .handle(|dto| async move { module.database().get_rental(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/returns",
            post(
                |State(module): State<AppModule<D>>,
                 WithRejection(Json(req), _): WithRejection<Json<RentalRequest>, ErrorStatus>| async move {
                    Controller::new(RentalTransformer, RentalPresenter)
                        .try_intake(ReturnRequest::new(req))
                        .map_err(ErrorStatus::from)?
                        .handle(|dto| async move { module.database().return_rental(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
