use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::books::list_books,
        api::books::create_book,
        api::books::get_book,
        api::books::update_book,
        api::readers::create_reader,
        api::readers::buy_book,
        api::readers::get_reader,
        api::readers::delete_reader,
        api::items::create_item,
    ),
    components(
        schemas(
            api::books::CreateBookRequest,
            api::books::UpdateBookRequest,
            api::readers::CreateReaderRequest,
            api::readers::BuyBookRequest,
            api::items::CreateItemRequest,
        )
    ),
    tags(
        (name = "library-lending", description = "Library lending records API")
    )
)]
pub struct ApiDoc;
