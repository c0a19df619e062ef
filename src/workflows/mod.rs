pub mod scan_intake;
