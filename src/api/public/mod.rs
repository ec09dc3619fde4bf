pub mod uploads;

pub use uploads::public_image_router;
