mod ops;
mod report;
