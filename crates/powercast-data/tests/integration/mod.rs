mod download;
mod preprocess;
