//! DTOs (Data Transfer Objects)
//!
//! Requests y responses de la API, y estructuras del proveedor de mapas.

pub mod api_response;
pub mod carrier_dto;
pub mod directions_dto;
pub mod driver_dto;
pub mod route_dto;
pub mod trip_dto;
