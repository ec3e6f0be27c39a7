mod attendance_tests;
