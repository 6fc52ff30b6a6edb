use proxy_wasm_link::{ Action, BufferType, HostError, LogLevel, MapType, Status };

#[test]
fn status_codes_match_the_abi() {
	let codes = [
		( Status::Ok, 0 ),
		( Status::NotFound, 1 ),
		( Status::BadArgument, 2 ),
		( Status::SerializationFailure, 3 ),
		( Status::Empty, 7 ),
		( Status::CasMismatch, 8 ),
		( Status::InternalFailure, 10 ),
		( Status::Unimplemented, 12 ),
	];
	for ( status, code ) in codes {
		assert_eq!( status.as_raw(), code );
		assert_eq!( Status::from_raw( code ), status );
	}
}

#[test]
fn undefined_status_codes_are_internal_failure() {
	assert_eq!( Status::from_raw( 4 ), Status::InternalFailure );
	assert_eq!( Status::from_raw( 99 ), Status::InternalFailure );
}

#[test]
fn every_host_error_has_a_status() {
	let errors = [
		HostError::NotFound,
		HostError::BadArgument,
		HostError::SerializationFailure,
		HostError::Empty,
		HostError::CasMismatch,
		HostError::InternalFailure,
		HostError::Unimplemented,
	];
	for error in errors {
		assert_eq!( Status::from( error ).into_result(), Err( error ));
	}
	assert_eq!( Status::Ok.into_result(), Ok(()) );
}

#[test]
fn grpc_types_are_unimplemented() {
	assert_eq!( MapType::from_raw( 4 ), Err( HostError::Unimplemented ));
	assert_eq!( MapType::from_raw( 5 ), Err( HostError::Unimplemented ));
	assert_eq!( BufferType::from_raw( 5 ), Err( HostError::Unimplemented ));
}

#[test]
fn undefined_enumerations_are_bad_argument() {
	assert_eq!( MapType::from_raw( 8 ), Err( HostError::BadArgument ));
	assert_eq!( BufferType::from_raw( 8 ), Err( HostError::BadArgument ));
	assert_eq!( LogLevel::from_raw( 6 ), Err( HostError::BadArgument ));
	assert_eq!( Action::from_raw( 2 ), Err( HostError::BadArgument ));
}

#[test]
fn log_levels_are_ordered_by_severity() {
	assert!( LogLevel::ALL.windows( 2 ).all(| pair | pair[0] < pair[1] ));
	assert_eq!( LogLevel::ALL.map( LogLevel::as_raw ), [ 0, 1, 2, 3, 4, 5 ]);
}
