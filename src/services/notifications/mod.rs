pub mod mail_service;
