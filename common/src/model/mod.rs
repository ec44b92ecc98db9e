pub mod category;
pub mod need;
pub mod need_key;
pub mod need_status;
pub mod projection;
pub mod response;
pub mod venue;
