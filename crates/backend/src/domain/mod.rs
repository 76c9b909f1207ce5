pub mod a001_customer;
pub mod a002_product;
pub mod a003_warehouse;
pub mod a004_b2b_offer;
pub mod a005_b2b_sale;
