mod support;

mod mapper_tests;
