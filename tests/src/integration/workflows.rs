//! # Lifecycle Workflows
//!
//! End-to-end job lifecycles through the inbound ports:
//!
//! 1. Submission and lookup
//! 2. Result rejection and retry
//! 3. Job rejection and refund
//! 4. Full success path
//! 5. Removal permissions
//!
//! Every rejected call is checked against a before/after snapshot.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use dqpu_contract::prelude::*;
    use dqpu_contract::{
        InputError, JobMarketService, MarketConfig, MarketEvent, Role, StateSnapshot,
    };

    /// Assert that `f` fails and leaves market and host untouched.
    fn assert_rejected_without_effect<T: std::fmt::Debug>(
        harness: &mut Harness,
        f: impl FnOnce(&mut Harness) -> Result<T, ContractError>,
    ) -> ContractError {
        let before = harness.snapshot();
        let transfers = harness.host.transfers().len();
        let events = harness.host.events().len();
        let custody = harness.host.custody();

        let err = f(harness).expect_err("call must be rejected");

        assert_eq!(harness.snapshot(), before);
        assert_eq!(harness.host.transfers().len(), transfers);
        assert_eq!(harness.host.events().len(), events);
        assert_eq!(harness.host.custody(), custody);
        err
    }

    // =========================================================================
    // SCENARIOS
    // =========================================================================

    #[test]
    fn test_submission_and_lookup() {
        let mut h = Harness::new();
        let id = h.submit("alice", 1).unwrap();

        assert_eq!(id, JobId::FIRST);
        assert_eq!(h.market.get_number_of_jobs(), 1);
        assert_eq!(h.status(id), JobStatus::PendingValidation);
        assert_eq!(h.market.get_handled_amount(), amount(1));

        let job = h.market.get_job(id).unwrap();
        assert_eq!(job.owner_id, account("alice"));
        assert_eq!(job.reward_amount, amount(1));
        assert_eq!((job.qubits, job.depth, job.shots), (4, 12, 512));
    }

    #[test]
    fn test_result_rejection_forfeits_collateral_and_reopens_job() {
        let mut h = Harness::with_verifier();
        let id = h.waiting_job("alice");
        assert_eq!(h.status(id), JobStatus::Waiting);

        h.submit_result("bob", id, COLLATERAL).unwrap();
        assert_eq!(h.status(id), JobStatus::ValidatingResult);
        assert_eq!(
            h.market.get_job(id).unwrap().sampler_id,
            Some(account("bob"))
        );

        let status = h.validate_result(OWNER, id, false).unwrap();
        assert_eq!(status, JobStatus::Waiting);

        let job = h.market.get_job(id).unwrap();
        assert!(job.sampler_id.is_none());
        assert!(job.sampler_deposit.is_zero());
        // forfeited to the rejecting verifier, not the job's verifier
        assert_eq!(h.received(OWNER), amount(COLLATERAL));
        assert!(h.received(VERIFIER).is_zero());
        assert!(h.received("bob").is_zero());

        // another sampler may retry
        h.submit_result("carol", id, COLLATERAL).unwrap();
        assert_eq!(h.status(id), JobStatus::ValidatingResult);
    }

    #[test]
    fn test_job_rejection_refunds_owner() {
        let mut h = Harness::with_verifier();
        let id = h.submit("alice", REWARD).unwrap();

        let status = h.validate_job(VERIFIER, id, false).unwrap();
        assert_eq!(status, JobStatus::Invalid);
        assert_eq!(h.received("alice"), amount(REWARD));
        assert_eq!(h.market.get_job(id).unwrap().verifier_id, Some(account(VERIFIER)));

        for valid in [true, false] {
            let err = assert_rejected_without_effect(&mut h, |h| {
                h.validate_job(VERIFIER, id, valid)
            });
            assert!(matches!(err, ContractError::InvalidState { .. }));
        }
    }

    #[test]
    fn test_full_success_path() {
        let mut h = Harness::with_verifier();
        let id = h.job_with_result("alice", "bob");

        let status = h.validate_result(OWNER, id, true).unwrap();
        assert_eq!(status, JobStatus::Executed);

        let job = h.market.get_job(id).unwrap();
        assert_eq!(job.trap_file.as_deref(), Some("QmTrapFile"));
        // the job verifier is kept
        assert_eq!(job.verifier_id, Some(account(VERIFIER)));
        assert_eq!(h.received(VERIFIER), amount(COLLATERAL));
        assert_eq!(h.received("bob"), amount(REWARD));
        assert!(h.received("alice").is_zero());
        assert!(h.host.custody().is_zero());
        assert_eq!(h.market.get_handled_amount(), amount(REWARD + COLLATERAL));

        let err = assert_rejected_without_effect(&mut h, |h| {
            h.validate_result(VERIFIER, id, true)
        });
        assert!(matches!(
            err,
            ContractError::InvalidState {
                actual: JobStatus::Executed,
                ..
            }
        ));
    }

    #[test]
    fn test_removal_permissions() {
        let mut h = Harness::with_verifier();
        let id = h.job_with_result("alice", "bob");

        let err = assert_rejected_without_effect(&mut h, |h| h.remove("mallory", id));
        assert!(matches!(err, ContractError::Unauthorized { .. }));

        let err = assert_rejected_without_effect(&mut h, |h| h.remove("alice", id));
        assert!(matches!(
            err,
            ContractError::InvalidState {
                actual: JobStatus::ValidatingResult,
                ..
            }
        ));

        let refunded = h.remove(OWNER, id).unwrap();
        assert_eq!(refunded, amount(REWARD));
        assert_eq!(h.received("alice"), amount(REWARD));
        assert_eq!(h.received("bob"), amount(COLLATERAL));
        assert!(h.host.custody().is_zero());
        assert_eq!(h.market.get_number_of_jobs(), 0);
        assert_eq!(
            h.market.get_job(id),
            Err(ContractError::NotFound(id))
        );
    }

    #[test]
    fn test_owner_removal_after_disposal_refunds_nothing() {
        let mut h = Harness::with_verifier();
        let executed = h.job_with_result("alice", "bob");
        h.validate_result(VERIFIER, executed, true).unwrap();
        let invalid = h.submit("alice", REWARD).unwrap();
        h.validate_job(VERIFIER, invalid, false).unwrap();
        let transfers = h.host.transfers().len();

        assert!(h.remove(OWNER, executed).unwrap().is_zero());
        assert!(h.remove(OWNER, invalid).unwrap().is_zero());
        assert_eq!(h.host.transfers().len(), transfers);
        assert_eq!(h.received("alice"), amount(REWARD));
    }

    #[test]
    fn test_job_owner_withdraws_waiting_job() {
        let mut h = Harness::with_verifier();
        let id = h.waiting_job("alice");
        assert_eq!(h.remove("alice", id).unwrap(), amount(REWARD));
        assert_eq!(h.stats(), dqpu_contract::JobStats::default());

        // ids are never reused
        assert_eq!(h.submit("alice", REWARD).unwrap(), JobId::new(2));
    }

    // =========================================================================
    // GUARDS
    // =========================================================================

    #[test]
    fn test_verifier_gated_operations_reject_outsiders() {
        let mut h = Harness::with_verifier();
        let pending = h.submit("alice", REWARD).unwrap();
        let validating = h.job_with_result("alice", "bob");

        let err = assert_rejected_without_effect(&mut h, |h| {
            h.validate_job("mallory", pending, true)
        });
        assert_eq!(
            err,
            ContractError::Unauthorized {
                caller: account("mallory"),
                required: Role::Verifier,
            }
        );

        let err = assert_rejected_without_effect(&mut h, |h| {
            h.validate_result("bob", validating, true)
        });
        assert!(matches!(err, ContractError::Unauthorized { .. }));
    }

    #[test]
    fn test_owner_gated_operations_reject_outsiders() {
        let mut h = Harness::with_verifier();
        h.submit("alice", REWARD).unwrap();

        let ops: Vec<Box<dyn FnOnce(&mut Harness) -> Result<(), ContractError>>> = vec![
            Box::new(|h: &mut Harness| {
                h.call(VERIFIER, 0, |m, host| m.add_verifier(host, account("eve")))
                    .map(drop)
            }),
            Box::new(|h: &mut Harness| {
                h.call(VERIFIER, 0, |m, host| m.remove_verifier(host, account(OWNER)))
                    .map(drop)
            }),
            Box::new(|h: &mut Harness| {
                h.call(VERIFIER, 0, |m, host| m.set_owner(host, account("eve")))
            }),
            Box::new(|h: &mut Harness| h.call("alice", 0, |m, host| m.clear_jobs(host)).map(drop)),
        ];
        for op in ops {
            let err = assert_rejected_without_effect(&mut h, op);
            assert!(matches!(
                err,
                ContractError::Unauthorized {
                    required: Role::Owner,
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_guard_order_auth_before_existence() {
        let mut h = Harness::new();
        let err = assert_rejected_without_effect(&mut h, |h| {
            h.validate_job("mallory", JobId::new(42), true)
        });
        assert!(matches!(err, ContractError::Unauthorized { .. }));

        let err = assert_rejected_without_effect(&mut h, |h| {
            h.validate_job(OWNER, JobId::new(42), true)
        });
        assert_eq!(err, ContractError::NotFound(JobId::new(42)));
    }

    #[test]
    fn test_sampler_cannot_be_job_owner_or_verifier() {
        let mut h = Harness::with_verifier();
        let id = h.waiting_job("alice");

        let err = assert_rejected_without_effect(&mut h, |h| {
            h.submit_result("alice", id, COLLATERAL)
        });
        assert_eq!(
            err,
            ContractError::InvalidInput(InputError::SelfDealing {
                role: Role::JobOwner
            })
        );

        let err = assert_rejected_without_effect(&mut h, |h| {
            h.submit_result(VERIFIER, id, COLLATERAL)
        });
        assert_eq!(
            err,
            ContractError::InvalidInput(InputError::SelfDealing {
                role: Role::JobVerifier
            })
        );

        // a verifier that did not rule on this job may sample it
        h.submit_result(OWNER, id, COLLATERAL).unwrap();
    }

    #[test]
    fn test_input_validation() {
        let mut h = Harness::with_verifier();

        let err = assert_rejected_without_effect(&mut h, |h| h.submit("alice", 0));
        assert_eq!(err, ContractError::InvalidInput(InputError::ZeroReward));

        let err = assert_rejected_without_effect(&mut h, |h| {
            h.call("alice", REWARD, |m, host| {
                m.submit_job(host, JobRequest::new(1, 1, 1, ""))
            })
        });
        assert_eq!(
            err,
            ContractError::InvalidInput(InputError::EmptyField("job_file"))
        );

        let id = h.submit("alice", REWARD).unwrap();
        let err = assert_rejected_without_effect(&mut h, |h| {
            h.call(VERIFIER, 0, |m, host| {
                m.set_job_validity(host, id, true, Some(String::new()))
            })
        });
        assert!(matches!(err, ContractError::InvalidInput(_)));

        h.validate_job(VERIFIER, id, true).unwrap();
        let err = assert_rejected_without_effect(&mut h, |h| {
            h.submit_result("bob", id, COLLATERAL - 1)
        });
        assert_eq!(
            err,
            ContractError::InvalidInput(InputError::InsufficientCollateral {
                required: amount(COLLATERAL),
                provided: amount(COLLATERAL - 1),
            })
        );

        let err = assert_rejected_without_effect(&mut h, |h| {
            h.call("bob", COLLATERAL, |m, host| {
                m.submit_job_result(host, id, String::new())
            })
        });
        assert_eq!(
            err,
            ContractError::InvalidInput(InputError::EmptyField("result_file"))
        );
    }

    // =========================================================================
    // ADMINISTRATION
    // =========================================================================

    #[test]
    fn test_trapped_file_replaces_payload() {
        let mut h = Harness::with_verifier();
        let id = h.submit("alice", REWARD).unwrap();
        h.call(VERIFIER, 0, |m, host| {
            m.set_job_validity(host, id, true, Some("QmTrappedCircuit".into()))
        })
        .unwrap();
        assert_eq!(h.market.get_job(id).unwrap().job_file, "QmTrappedCircuit");
    }

    #[test]
    fn test_ownership_transfer() {
        let mut h = Harness::new();
        h.call(OWNER, 0, |m, host| m.set_owner(host, account("new-owner")))
            .unwrap();

        assert_eq!(h.market.get_owner(), account("new-owner"));
        assert!(!h.market.is_a_verifier(&account("new-owner")));
        // the bootstrap owner keeps its verifier seat
        assert!(h.market.is_a_verifier(&account(OWNER)));

        assert!(h
            .call("new-owner", 0, |m, host| m.add_verifier(host, account("new-owner")))
            .unwrap());
        let err = h
            .call(OWNER, 0, |m, host| m.add_verifier(host, account("eve")))
            .unwrap_err();
        assert!(matches!(err, ContractError::Unauthorized { .. }));
    }

    #[test]
    fn test_verifier_pagination() {
        let mut h = Harness::new();
        for name in ["v1", "v2", "v3", "v4"] {
            h.call(OWNER, 0, |m, host| m.add_verifier(host, account(name)))
                .unwrap();
        }
        assert_eq!(h.market.get_number_of_verifiers(), 5);
        assert_eq!(
            h.market.get_verifiers(1, Some(2)),
            vec![account("v1"), account("v2")]
        );
        assert_eq!(h.market.get_verifiers(0, None).len(), 5);
    }

    #[test]
    fn test_clear_jobs_resets_ledger_not_counter() {
        let mut h = Harness::with_verifier();
        h.waiting_job("alice");
        h.submit("bob", REWARD).unwrap();

        let count = h.call(OWNER, 0, |m, host| m.clear_jobs(host)).unwrap();
        assert_eq!(count, 2);
        assert_eq!(h.market.get_number_of_jobs(), 0);
        assert_eq!(h.stats().total(), 0);
        assert_eq!(h.submit("alice", REWARD).unwrap(), JobId::new(3));
    }

    // =========================================================================
    // EVENTS, SNAPSHOTS, SERVICE
    // =========================================================================

    #[test]
    fn test_lifecycle_events() {
        let mut h = Harness::with_verifier();
        let id = h.job_with_result("alice", "bob");
        h.validate_result(VERIFIER, id, true).unwrap();

        let names: Vec<_> = h.host.events().iter().map(MarketEvent::name).collect();
        assert_eq!(
            names,
            vec![
                "verifier_added",
                "job_submitted",
                "job_validated",
                "result_submitted",
                "result_validated",
            ]
        );

        let line = h.host.events()[4].to_log_line().unwrap();
        assert!(line.starts_with("EVENT_JSON:{\"standard\":\"dqpu\",\"version\":\"1.0.0\""));
        assert!(line.contains("\"event\":\"result_validated\""));
        assert!(line.contains("\"status\":\"executed\""));
    }

    #[test]
    fn test_snapshot_restore_continues_lifecycle() {
        let mut h = Harness::with_verifier();
        let id = h.job_with_result("alice", "bob");
        h.submit("carol", REWARD).unwrap();

        let bytes = h.snapshot().encode().unwrap();
        let restored =
            JobMarket::restore(StateSnapshot::decode(&bytes).unwrap(), MarketConfig::default())
                .unwrap();
        assert_eq!(restored, h.market);

        h.market = restored;
        assert_eq!(h.validate_result(VERIFIER, id, true).unwrap(), JobStatus::Executed);
        assert_eq!(h.submit("carol", REWARD).unwrap(), JobId::new(3));
    }

    #[test]
    fn test_service_runs_lifecycle() {
        init_test_tracing();
        let service = JobMarketService::new(JobMarket::new(account(OWNER)));
        let mut host = InMemoryHost::new(OWNER);

        let id = host
            .invoke(&account("alice"), amount(REWARD), |h| {
                service.submit_job(h, request())
            })
            .unwrap();
        host.invoke(&account(OWNER), amount(0), |h| {
            service.set_job_validity(h, id, true, None)
        })
        .unwrap();
        host.invoke(&account("bob"), amount(COLLATERAL), |h| {
            service.submit_job_result(h, id, "QmResult".into())
        })
        .unwrap();
        let err = host
            .invoke(&account("bob"), amount(0), |h| {
                service.set_result_validity(h, id, true, Some("trap".into()))
            })
            .unwrap_err();
        assert!(matches!(err, ContractError::Unauthorized { .. }));
        host.invoke(&account(OWNER), amount(0), |h| {
            service.set_result_validity(h, id, true, Some("trap".into()))
        })
        .unwrap();

        assert_eq!(
            service.read(|m| m.get_job_status(id)).unwrap(),
            JobStatus::Executed
        );
        let stats = service.stats();
        assert_eq!(stats.invocations, 5);
        assert_eq!(stats.successes, 4);
        assert_eq!(stats.rejected(), 1);
        assert!(host.custody().is_zero());
    }
}
