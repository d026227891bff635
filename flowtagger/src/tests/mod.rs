mod lookup_test;
