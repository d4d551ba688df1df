mod navigation;
mod persistence;
mod rest_identity;
