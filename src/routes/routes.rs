use actix_web::web;

use crate::handlers::contact_handler::submit_contact;
use crate::handlers::env_handler::test_env;
use crate::handlers::health_handler::hello;
use crate::handlers::photo_handler::get_photos;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(hello)
        .service(get_photos)
        .service(test_env)
        .service(submit_contact);
}
