mod knn;

pub use knn::Knn;
