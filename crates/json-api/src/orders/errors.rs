//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use bookshelf_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::Forbidden => {
            StatusError::forbidden().brief("Not allowed to access this order")
        }
        OrdersServiceError::EmptyCart => {
            StatusError::unprocessable_entity().brief("Cart is empty")
        }
        OrdersServiceError::InsufficientStock { book, available } => StatusError::conflict()
            .brief(format!("Only {available} of book {book} in stock"))
            .detail(book.to_string()),
        OrdersServiceError::UnknownDiscountCode => {
            StatusError::unprocessable_entity().brief("Unknown discount code")
        }
        OrdersServiceError::Ineligible(reason) => StatusError::unprocessable_entity()
            .brief(reason.to_string())
            .detail(reason.as_str()),
        OrdersServiceError::Transition(source) => {
            StatusError::unprocessable_entity().brief(source.to_string())
        }
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::Pricing(source) => {
            error!("failed to price order: {source}");

            StatusError::internal_server_error()
        }
        OrdersServiceError::Sql(source) => {
            error!("failed to access orders: {source}");

            StatusError::internal_server_error()
        }
    }
}
