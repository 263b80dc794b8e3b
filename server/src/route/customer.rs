use application::service::{
    CreateCustomerService, DeleteCustomerService, GetCustomerService, UpdateCustomerService,
};
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::WithRejection;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::{AppModule, Store};
use crate::request::{
    CustomerRequest, CustomerTransformer, DeleteCustomerRequest, GetCustomerRequest,
};
use crate::response::CustomerPresenter;

pub trait CustomerRouter {
    fn route_customer(self) -> Self;
}

impl<D: Store> CustomerRouter for Router<AppModule<D>> {
    fn route_customer(self) -> Self {
        self.route(
            "/customers",
            get(|State(module): State<AppModule<D>>| async move {
                Controller::new((), CustomerPresenter)
                    .bypass(|| async move { module.database().get_customers().await })
                    .await
                    .map_err(ErrorStatus::from)
            })
            .post(
                |State(module): State<AppModule<D>>,
                 WithRejection(Json(req), _): WithRejection<Json<CustomerRequest>, ErrorStatus>| async move {
                    Controller::new(CustomerTransformer, CustomerPresenter)
                        .try_intake(req)
                        .map_err(ErrorStatus::from)?
                        .handle(|dto| async move { module.database().create_customer(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/customers/:id",
            get(
                |State(module): State<AppModule<D>>, Path(id): Path<String>| async move {
                    Controller::new(CustomerTransformer, CustomerPresenter)
                        .try_intake(GetCustomerRequest::new(id))
                        .map_err(ErrorStatus::from)?
                        .handle(|dto| async move { module.database().get_customer(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .put(
                |State(module): State<AppModule<D>>,
                 Path(id): Path<String>,
                 WithRejection(Json(req), _): WithRejection<Json<CustomerRequest>, ErrorStatus>| async move {
                    Controller::new(CustomerTransformer, CustomerPresenter)
                        .try_intake((id, req))
                        .map_err(ErrorStatus::from)?
                        .handle(|dto| async move { module.database().update_customer(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule<D>>, Path(id): Path<String>| async move {
                    Controller::new(CustomerTransformer, CustomerPresenter)
                        .try_intake(DeleteCustomerRequest::new(id))
                        .map_err(ErrorStatus::from)?
                        .handle(|dto| async move { module.database().delete_customer(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
