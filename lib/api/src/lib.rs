pub mod grpc;
pub mod rest;

pub use grpc::GrpcApi;
pub use rest::RestApi;
