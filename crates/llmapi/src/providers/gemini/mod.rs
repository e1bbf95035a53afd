mod api;
pub mod models;

pub use api::{
    build_generate_body, first_inline_image, response_to_text_data, send_generate_request,
};
